//! Keyboard mapping for the demo scene.

use glam::{Vec3, vec3};
use sdl2::keyboard::Keycode;

/// A world axis a rotation command acts about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => vec3(1.0, 0.0, 0.0),
            Axis::Y => vec3(0.0, 1.0, 0.0),
            Axis::Z => vec3(0.0, 0.0, 1.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// What a single key press asks the application to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneCommand {
    Quit,
    Wireframe,
    Fill,
    Fullscreen,
    Windowed,
    ResetView,
    /// Rotate one step about a single world axis.
    Spin { axis: Axis, negative: bool },
}

/// Maps a key press to a command. Every key carries at most one command;
/// there is no chording.
pub fn map_keycode(keycode: Keycode) -> Option<SceneCommand> {
    match keycode {
        Keycode::Escape => Some(SceneCommand::Quit),
        Keycode::W => Some(SceneCommand::Wireframe),
        Keycode::S => Some(SceneCommand::Fill),
        Keycode::F => Some(SceneCommand::Fullscreen),
        Keycode::N => Some(SceneCommand::Windowed),
        Keycode::Space => Some(SceneCommand::ResetView),
        Keycode::Left => Some(SceneCommand::Spin {
            axis: Axis::Z,
            negative: true,
        }),
        Keycode::Right => Some(SceneCommand::Spin {
            axis: Axis::Z,
            negative: false,
        }),
        Keycode::Up => Some(SceneCommand::Spin {
            axis: Axis::X,
            negative: true,
        }),
        Keycode::Down => Some(SceneCommand::Spin {
            axis: Axis::X,
            negative: false,
        }),
        Keycode::K => Some(SceneCommand::Spin {
            axis: Axis::Y,
            negative: true,
        }),
        Keycode::L => Some(SceneCommand::Spin {
            axis: Axis::Y,
            negative: false,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quits() {
        assert_eq!(map_keycode(Keycode::Escape), Some(SceneCommand::Quit));
    }

    #[test]
    fn arrows_spin_z_and_x() {
        assert_eq!(
            map_keycode(Keycode::Left),
            Some(SceneCommand::Spin {
                axis: Axis::Z,
                negative: true
            })
        );
        assert_eq!(
            map_keycode(Keycode::Right),
            Some(SceneCommand::Spin {
                axis: Axis::Z,
                negative: false
            })
        );
        assert_eq!(
            map_keycode(Keycode::Up),
            Some(SceneCommand::Spin {
                axis: Axis::X,
                negative: true
            })
        );
        assert_eq!(
            map_keycode(Keycode::Down),
            Some(SceneCommand::Spin {
                axis: Axis::X,
                negative: false
            })
        );
    }

    #[test]
    fn k_and_l_spin_y() {
        assert_eq!(
            map_keycode(Keycode::K),
            Some(SceneCommand::Spin {
                axis: Axis::Y,
                negative: true
            })
        );
        assert_eq!(
            map_keycode(Keycode::L),
            Some(SceneCommand::Spin {
                axis: Axis::Y,
                negative: false
            })
        );
    }

    #[test]
    fn paired_keys_share_an_axis_with_opposite_signs() {
        let pairs = [
            (Keycode::Left, Keycode::Right),
            (Keycode::Up, Keycode::Down),
            (Keycode::K, Keycode::L),
        ];
        for (neg, pos) in pairs {
            let Some(SceneCommand::Spin {
                axis: a,
                negative: true,
            }) = map_keycode(neg)
            else {
                panic!("{neg} should spin negatively");
            };
            let Some(SceneCommand::Spin {
                axis: b,
                negative: false,
            }) = map_keycode(pos)
            else {
                panic!("{pos} should spin positively");
            };
            assert_eq!(a, b);
        }
    }

    #[test]
    fn mode_keys_map_to_toggles() {
        assert_eq!(map_keycode(Keycode::W), Some(SceneCommand::Wireframe));
        assert_eq!(map_keycode(Keycode::S), Some(SceneCommand::Fill));
        assert_eq!(map_keycode(Keycode::F), Some(SceneCommand::Fullscreen));
        assert_eq!(map_keycode(Keycode::N), Some(SceneCommand::Windowed));
        assert_eq!(map_keycode(Keycode::Space), Some(SceneCommand::ResetView));
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        assert_eq!(map_keycode(Keycode::A), None);
        assert_eq!(map_keycode(Keycode::Return), None);
    }

    #[test]
    fn axis_units_are_orthonormal() {
        assert_eq!(Axis::X.unit().dot(Axis::Y.unit()), 0.0);
        assert_eq!(Axis::Y.unit().dot(Axis::Z.unit()), 0.0);
        assert_eq!(Axis::X.unit().length(), 1.0);
    }
}
