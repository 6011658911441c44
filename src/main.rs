use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliArgs {
    playlist_file: Option<PathBuf>,
    no_audio: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args(std::env::args().skip(1).collect())?;
    chime::app::run(chime::app::AppOptions {
        playlist_file: args
            .playlist_file
            .unwrap_or_else(|| PathBuf::from("playlist.txt")),
        no_audio: args.no_audio,
    })
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--no-audio" => out.no_audio = true,
            "--playlist" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--playlist requires a file path");
                };
                if value.trim().is_empty() {
                    anyhow::bail!("--playlist cannot be empty");
                }
                out.playlist_file = Some(PathBuf::from(value));
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn print_help() {
    println!("chime");
    println!("  --playlist <file>  Playlist file to load and save (default playlist.txt)");
    println!("  --no-audio         Run without an audio device");
}
