#![no_main]

use chime::audio::NullBackend;
use chime::player::{Player, PlayerStatus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut player = Player::new(Box::new(NullBackend::new()));
    let len = (data.len() % 16).max(1);
    for n in 0..len {
        player.add_track(format!("track_{n}.mp3"));
    }

    for byte in data {
        match byte % 8 {
            0 => {
                let _ = player.play();
            }
            1 => player.pause(),
            2 => player.stop(),
            3 => {
                let _ = player.next();
            }
            4 => {
                let _ = player.previous();
            }
            5 => player.set_volume(f32::from(*byte) * 2.0 - 100.0),
            6 => {
                let _ = player.toggle_loop();
            }
            _ => {
                let _ = player.open_track(usize::from(*byte) % (len + 2));
            }
        }

        if let Some(cursor) = player.playlist().cursor() {
            assert!(cursor < player.playlist().len());
        }
        assert!((0.0..=100.0).contains(&player.volume()));
        if let PlayerStatus::Loaded { .. } = player.status() {
            assert!(player.playlist().cursor().is_some());
        }
    }
});
