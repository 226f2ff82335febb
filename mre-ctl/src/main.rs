mod args;
use args::{parse_args, Commands};

mod core;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let command = parse_args();

    match command {
        Commands::Create {
            map,
            reduce,
            guid,
            output,
        } => core::create(map, reduce, guid, output)?,
        Commands::Inspect { file } => core::inspect(&file)?,
        Commands::Validate { file } => core::validate(&file)?,
    }

    Ok(())
}
