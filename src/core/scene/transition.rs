//=========================================================================
// Scene Transitions
//=========================================================================
//
// Time-based entrance animations for newly started scenes.
//
// A transition moves a scene's pose from an "off" state (transparent or
// shifted by one screen) to the identity pose with linear easing. The
// manager only writes the pose; drawing it is left to whatever view
// layer reads `SceneCore::pose()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== SceneTransition =====================================================

/// Entrance animation applied when a scene is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneTransition {
    FadeIn,
    FadeOut,
    MoveInLeft,
    MoveInRight,
    MoveInDown,
    MoveInUp,
}

impl SceneTransition {
    /// Pose the scene starts from before the animation runs.
    pub fn off_pose(self, screen: ScreenSize) -> ScenePose {
        let identity = ScenePose::IDENTITY;
        match self {
            Self::FadeIn | Self::FadeOut => ScenePose { alpha: 0.0, ..identity },
            Self::MoveInLeft => ScenePose { x: -screen.width, ..identity },
            Self::MoveInRight => ScenePose { x: screen.width, ..identity },
            Self::MoveInDown => ScenePose { y: screen.height, ..identity },
            Self::MoveInUp => ScenePose { y: -screen.height, ..identity },
        }
    }
}

//=== ScreenSize ==========================================================

/// Dimensions used by the move-in transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

//=== ScenePose ===========================================================

/// Visual offset of a scene, as driven by transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePose {
    pub alpha: f32,
    pub x: f32,
    pub y: f32,
}

impl ScenePose {
    pub const IDENTITY: ScenePose = ScenePose {
        alpha: 1.0,
        x: 0.0,
        y: 0.0,
    };

    fn lerp(from: ScenePose, to: ScenePose, t: f32) -> ScenePose {
        ScenePose {
            alpha: from.alpha + (to.alpha - from.alpha) * t,
            x: from.x + (to.x - from.x) * t,
            y: from.y + (to.y - from.y) * t,
        }
    }
}

impl Default for ScenePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=== Tween ===============================================================

/// Linear tween from an off pose to [`ScenePose::IDENTITY`].
///
/// A tween is inert until [`Tween::start`] is called; the manager starts
/// it once the scene becomes playing.
#[derive(Debug, Clone)]
pub struct Tween {
    from: ScenePose,
    duration: f64,
    elapsed: f64,
    started: bool,
    finished: bool,
}

impl Tween {
    pub fn new(transition: SceneTransition, duration: f64, screen: ScreenSize) -> Self {
        Self {
            from: transition.off_pose(screen),
            duration: duration.max(0.0),
            elapsed: 0.0,
            started: false,
            finished: false,
        }
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Fraction of the animation completed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return if self.started { 1.0 } else { 0.0 };
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Current pose.
    pub fn pose(&self) -> ScenePose {
        ScenePose::lerp(self.from, ScenePose::IDENTITY, self.progress() as f32)
    }

    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Advances a started tween.
    ///
    /// Returns `true` on the call that completes it, `false` otherwise. A
    /// zero-length tween completes on its first advance.
    pub fn advance(&mut self, delta: f64) -> bool {
        if !self.started || self.finished {
            return false;
        }
        self.elapsed += delta.max(0.0);
        if self.elapsed >= self.duration {
            self.finished = true;
        }
        self.finished
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn off_poses_per_transition() {
        assert_eq!(SceneTransition::FadeIn.off_pose(SCREEN).alpha, 0.0);
        assert_eq!(SceneTransition::FadeOut.off_pose(SCREEN).alpha, 0.0);
        assert_eq!(SceneTransition::MoveInLeft.off_pose(SCREEN).x, -800.0);
        assert_eq!(SceneTransition::MoveInRight.off_pose(SCREEN).x, 800.0);
        assert_eq!(SceneTransition::MoveInDown.off_pose(SCREEN).y, 600.0);
        assert_eq!(SceneTransition::MoveInUp.off_pose(SCREEN).y, -600.0);
    }

    #[test]
    fn tween_is_inert_until_started() {
        let mut tween = Tween::new(SceneTransition::FadeIn, 1.0, SCREEN);

        assert!(!tween.advance(5.0));
        assert_eq!(tween.pose().alpha, 0.0);
        assert!(!tween.is_complete());
    }

    #[test]
    fn tween_interpolates_linearly() {
        let mut tween = Tween::new(SceneTransition::MoveInRight, 2.0, SCREEN);
        tween.start();

        assert!(!tween.advance(1.0));
        assert_eq!(tween.pose().x, 400.0);
        assert_eq!(tween.pose().alpha, 1.0);
    }

    #[test]
    fn tween_reports_completion_once() {
        let mut tween = Tween::new(SceneTransition::FadeIn, 1.0, SCREEN);
        tween.start();

        assert!(!tween.advance(0.5));
        assert!(tween.advance(0.75));
        assert!(!tween.advance(1.0));
        assert_eq!(tween.pose(), ScenePose::IDENTITY);
    }

    #[test]
    fn zero_duration_completes_on_first_advance() {
        let mut tween = Tween::new(SceneTransition::MoveInUp, 0.0, SCREEN);
        tween.start();

        assert!(!tween.is_complete());
        assert!(tween.advance(0.0));
        assert!(tween.is_complete());
        assert_eq!(tween.progress(), 1.0);
        assert!(!tween.advance(0.0));
    }

    #[test]
    fn transitions_parse_from_snake_case() {
        #[derive(Deserialize)]
        struct Holder {
            transition: SceneTransition,
        }

        let holder: Holder = toml::from_str(r#"transition = "move_in_left""#).unwrap();
        assert_eq!(holder.transition, SceneTransition::MoveInLeft);
    }
}
