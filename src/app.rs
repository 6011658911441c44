use crate::audio::{AudioBackend, NullBackend, RodioBackend};
use crate::config::{self, Settings};
use crate::player::{Player, PlayerStatus};
use anyhow::Result;
use log::{debug, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

// Keeps the prompt loop from spinning when stdin is a pipe.
const LOOP_PACING: Duration = Duration::from_millis(120);

pub struct AppOptions {
    pub playlist_file: PathBuf,
    pub no_audio: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Load,
    Save,
    Add,
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    Volume,
    ToggleLoop,
    Dump,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let first = line.trim().chars().next()?;
    match first.to_ascii_uppercase() {
        'L' => Some(Command::Load),
        'S' => Some(Command::Save),
        'A' => Some(Command::Add),
        'P' => Some(Command::Play),
        'U' => Some(Command::Pause),
        'T' => Some(Command::Stop),
        'N' => Some(Command::Next),
        'B' => Some(Command::Previous),
        'V' => Some(Command::Volume),
        'O' => Some(Command::ToggleLoop),
        'D' => Some(Command::Dump),
        'Q' => Some(Command::Quit),
        _ => None,
    }
}

pub fn run(options: AppOptions) -> Result<()> {
    let settings = config::load_settings()?;

    let backend: Box<dyn AudioBackend> = if options.no_audio {
        Box::new(NullBackend::new())
    } else {
        match RodioBackend::new() {
            Ok(backend) => Box::new(backend),
            Err(err) => {
                warn!("audio output unavailable, running silent: {err:#}");
                Box::new(NullBackend::new())
            }
        }
    };

    let mut player = Player::new(backend);
    player.set_volume(settings.volume);
    player.set_looping(settings.looping);

    match player.load_playlist(&options.playlist_file) {
        Ok(count) => {
            println!(
                "Loaded playlist: {} ({count} tracks)",
                options.playlist_file.display()
            );
            match player.play() {
                Ok(()) => println!("Now playing first track automatically..."),
                Err(err) => println!("Could not start playback: {err}"),
            }
        }
        Err(err) => {
            debug!("playlist auto-load skipped: {err}");
            println!("No playlist found, start by adding songs (A) or load manually (L).");
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("--- chime ---");
        print_status(&player);
        print_menu();
        print!("Choice: ");
        io::stdout().flush()?;

        let Some(line) = next_line(&mut lines)? else {
            player.stop();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = parse_command(&line) else {
            println!("Unknown command: {}", line.trim());
            continue;
        };

        match command {
            Command::Load => match player.load_playlist(&options.playlist_file) {
                Ok(count) => println!(
                    "Loaded playlist from {} ({count} tracks)",
                    options.playlist_file.display()
                ),
                Err(err) => println!("Failed to load playlist: {err}"),
            },
            Command::Save => match player.save_playlist(&options.playlist_file) {
                Ok(()) => println!("Saved playlist to {}", options.playlist_file.display()),
                Err(err) => println!("Failed to save playlist: {err}"),
            },
            Command::Add => {
                print!("Enter path to audio file: ");
                io::stdout().flush()?;
                let Some(path) = next_line(&mut lines)? else {
                    player.stop();
                    break;
                };
                if !path.is_empty() {
                    player.add_track(path);
                }
            }
            Command::Play => {
                if let Err(err) = player.play() {
                    println!("{err}");
                }
            }
            Command::Pause => player.pause(),
            Command::Stop => player.stop(),
            Command::Next => {
                if let Err(err) = player.next() {
                    println!("{err}");
                }
            }
            Command::Previous => {
                if let Err(err) = player.previous() {
                    println!("{err}");
                }
            }
            Command::Volume => {
                print!("Enter volume (0-100): ");
                io::stdout().flush()?;
                let Some(input) = next_line(&mut lines)? else {
                    player.stop();
                    break;
                };
                match input.trim().parse::<f32>() {
                    Ok(volume) => {
                        player.set_volume(volume);
                        println!("Volume set to {}", player.volume());
                    }
                    Err(_) => println!("Invalid volume"),
                }
            }
            Command::ToggleLoop => {
                let looping = player.toggle_loop();
                println!("Looping is now {}", if looping { "ON" } else { "OFF" });
            }
            Command::Dump => print_playlist(&player),
            Command::Quit => {
                player.stop();
                println!("Exiting.");
                break;
            }
        }

        thread::sleep(LOOP_PACING);
    }

    config::save_settings(&Settings {
        volume: player.volume(),
        looping: player.looping(),
    })?;
    Ok(())
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

fn print_status(player: &Player) {
    match player.status() {
        PlayerStatus::Idle => println!("Status: No track loaded"),
        PlayerStatus::Loaded {
            playback,
            track,
            volume,
            looping,
        } => {
            println!(
                "Status: {playback} | Track: {track} | Volume: {volume} | Loop: {}",
                if looping { "Yes" } else { "No" }
            );
        }
    }
}

fn print_menu() {
    println!("Commands:");
    println!(" (L)oad playlist from file");
    println!(" (S)ave playlist to file");
    println!(" (A)dd song (path)");
    println!(" (P)lay");
    println!(" (U) Pause");
    println!(" S(t)op");
    println!(" (N)ext");
    println!(" (B)ack (previous)");
    println!(" (V)olume set");
    println!(" (O) Toggle loop");
    println!(" (D)ump playlist");
    println!(" (Q)uit");
}

fn print_playlist(player: &Player) {
    let playlist = player.playlist();
    println!("Playlist ({}):", playlist.len());
    for (index, track) in playlist.iter().enumerate() {
        let marker = if playlist.cursor() == Some(index) {
            " -> "
        } else {
            "    "
        };
        println!("{marker}{index}: {track}");
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, parse_command};

    #[test]
    fn commands_parse_case_insensitively() {
        assert_eq!(parse_command("p"), Some(Command::Play));
        assert_eq!(parse_command("P"), Some(Command::Play));
        assert_eq!(parse_command("  n"), Some(Command::Next));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("t"), Some(Command::Stop));
        assert_eq!(parse_command("b"), Some(Command::Previous));
        assert_eq!(parse_command("o"), Some(Command::ToggleLoop));
    }

    #[test]
    fn unknown_and_empty_input_parse_to_none() {
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }
}
