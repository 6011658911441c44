use chime::audio::{AudioBackend, NullBackend, NullTrack, PlaybackStatus, TrackHandle};
use chime::error::Error;
use chime::player::{Player, PlayerStatus};
use tempfile::tempdir;

#[test]
fn transport_flow_works() {
    let mut player = Player::new(Box::new(NullBackend::new()));
    player.add_track("a.mp3");
    player.add_track("b.mp3");
    player.add_track("c.mp3");

    player.play().expect("play");
    let PlayerStatus::Loaded { playback, track, .. } = player.status() else {
        panic!("expected a loaded track");
    };
    assert_eq!(playback, PlaybackStatus::Playing);
    assert_eq!(track, "a.mp3");

    player.pause();
    let PlayerStatus::Loaded { playback, .. } = player.status() else {
        panic!("expected a loaded track");
    };
    assert_eq!(playback, PlaybackStatus::Paused);

    player.next().expect("next");
    assert_eq!(player.playlist().cursor(), Some(1));

    player.previous().expect("previous");
    assert_eq!(player.playlist().cursor(), Some(0));
}

#[test]
fn next_from_last_track_wraps_to_first() {
    let mut player = Player::new(Box::new(NullBackend::new()));
    player.add_track("a.mp3");
    player.add_track("b.mp3");
    player.add_track("c.mp3");
    player.open_track(2).expect("open last");

    player.next().expect("next");

    assert_eq!(player.playlist().cursor(), Some(0));
    let PlayerStatus::Loaded { playback, track, .. } = player.status() else {
        panic!("expected a loaded track");
    };
    assert_eq!(playback, PlaybackStatus::Playing);
    assert_eq!(track, "a.mp3");
}

#[test]
fn playlist_survives_a_save_load_round_trip() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("playlist.txt");

    let mut player = Player::new(Box::new(NullBackend::new()));
    player.add_track("one.mp3");
    player.add_track("two.flac");
    player.add_track("one.mp3");
    player.save_playlist(&file).expect("save");

    let mut restored = Player::new(Box::new(NullBackend::new()));
    let count = restored.load_playlist(&file).expect("load");

    assert_eq!(count, 3);
    let tracks: Vec<&str> = restored.playlist().iter().collect();
    assert_eq!(tracks, vec!["one.mp3", "two.flac", "one.mp3"]);
    assert_eq!(restored.playlist().cursor(), Some(0));
}

#[test]
fn play_on_a_fresh_player_reports_empty_playlist() {
    let mut player = Player::new(Box::new(NullBackend::new()));
    assert!(matches!(player.play(), Err(Error::EmptyPlaylist)));
    assert_eq!(player.status(), PlayerStatus::Idle);
}

struct RejectingBackend;

impl AudioBackend for RejectingBackend {
    fn open(&mut self, reference: &str) -> anyhow::Result<Box<dyn TrackHandle>> {
        if reference.ends_with(".broken") {
            anyhow::bail!("no decoder for {reference}");
        }
        Ok(Box::new(NullTrack::new(reference)))
    }
}

#[test]
fn failed_open_leaves_cursor_and_reports_reference() {
    let mut player = Player::new(Box::new(RejectingBackend));
    player.add_track("good.mp3");
    player.add_track("track.broken");
    player.play().expect("play good");

    let err = player.next().expect_err("next should fail to open");

    assert!(matches!(err, Error::Open { ref reference, .. } if reference == "track.broken"));
    assert_eq!(player.playlist().cursor(), Some(0));
    assert_eq!(player.status(), PlayerStatus::Idle);
}

#[test]
fn stopping_keeps_the_track_loaded_for_the_next_play() {
    let mut player = Player::new(Box::new(NullBackend::new()));
    player.add_track("a.mp3");
    player.play().expect("play");

    player.stop();
    let PlayerStatus::Loaded { playback, .. } = player.status() else {
        panic!("stop must keep the handle loaded");
    };
    assert_eq!(playback, PlaybackStatus::Stopped);

    player.play().expect("restart");
    let PlayerStatus::Loaded { playback, .. } = player.status() else {
        panic!("expected a loaded track");
    };
    assert_eq!(playback, PlaybackStatus::Playing);
}
