use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

/// Notifications from the audio collaborator. Sent from whatever thread the
/// audio backend runs on and drained by the thread that owns the scene.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlaybackEvent {
    Finished { successfully: bool },
}

pub type PlaybackEventSender = Sender<PlaybackEvent>;
pub type PlaybackEventReceiver = Receiver<PlaybackEvent>;

pub fn playback_channel() -> (PlaybackEventSender, PlaybackEventReceiver) {
    mpsc::channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_cross_threads() {
        let (tx, rx) = playback_channel();
        std::thread::spawn(move || {
            tx.send(PlaybackEvent::Finished { successfully: true })
                .expect("send finished");
        })
        .join()
        .expect("join sender");

        assert_eq!(
            rx.recv().expect("recv finished"),
            PlaybackEvent::Finished { successfully: true }
        );
    }
}
