use serde::{Deserialize, Serialize};

use super::choreographer::ChoreographerState;
use crate::core::logging::{debug, info, warn};
use crate::scene::Color;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Scene,
    EndScreen,
}

/// View-facing state the host renders from. The core never draws; it only
/// says which surface is up and where the fades are heading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub surface: Surface,
    /// Target opacity of the 3-D view.
    pub scene_opacity: f32,
    pub fade_duration: f32,
    pub start_control_visible: bool,
    pub background: Color,
    pub visible: bool,
}

impl Presentation {
    pub fn new(fade_duration: f32, background: Color) -> Self {
        Self {
            surface: Surface::Scene,
            scene_opacity: 0.0,
            fade_duration,
            start_control_visible: true,
            background,
            visible: false,
        }
    }

    pub fn reveal_scene(&mut self) {
        self.start_control_visible = false;
        self.scene_opacity = 1.0;
    }

    pub fn show_end_screen(&mut self) {
        self.scene_opacity = 0.0;
        self.surface = Surface::EndScreen;
    }
}

/// Terminal transition driven by the audio collaborator's finished
/// notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaybackCompletionHandler;

impl PlaybackCompletionHandler {
    /// Returns `true` when this call moved the session to `Finished`.
    pub fn handle(
        &self,
        state: &mut ChoreographerState,
        presentation: &mut Presentation,
        successfully: bool,
    ) -> bool {
        if *state != ChoreographerState::Running {
            debug!("Ignoring playback finished while {:?}", state);
            return false;
        }

        if !successfully {
            warn!("Playback ended unsuccessfully; ending the session anyway");
        }

        presentation.show_end_screen();
        *state = ChoreographerState::Finished;
        info!("Playback finished; showing end screen");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishes_only_while_running() {
        let handler = PlaybackCompletionHandler;
        let mut presentation = Presentation::new(1.0, Color::BLACK);

        let mut state = ChoreographerState::Idle;
        assert!(!handler.handle(&mut state, &mut presentation, true));
        assert_eq!(state, ChoreographerState::Idle);
        assert_eq!(presentation.surface, Surface::Scene);

        let mut state = ChoreographerState::Running;
        presentation.reveal_scene();
        assert!(handler.handle(&mut state, &mut presentation, true));
        assert_eq!(state, ChoreographerState::Finished);
        assert_eq!(presentation.surface, Surface::EndScreen);
        assert_eq!(presentation.scene_opacity, 0.0);

        assert!(!handler.handle(&mut state, &mut presentation, true));
    }

    #[test]
    fn unsuccessful_finish_still_ends() {
        let handler = PlaybackCompletionHandler;
        let mut presentation = Presentation::new(1.0, Color::BLACK);
        let mut state = ChoreographerState::Running;

        assert!(handler.handle(&mut state, &mut presentation, false));
        assert_eq!(state, ChoreographerState::Finished);
    }
}
