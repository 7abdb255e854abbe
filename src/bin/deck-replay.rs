use deck_extensions::{launch, logger, replay};

fn main() -> anyhow::Result<()> {
    let args = launch::parse_launch_args()?;
    let _guard = match &args.log {
        Some(app_id) => Some(logger::init(app_id)?),
        None => {
            logger::init_stderr();
            None
        }
    };

    let report = replay::run_file(&args.scene)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
