//! Player input: arrow keys plus the on-screen joystick, fused into a single
//! movement direction.

/// Held state of the four arrow keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Apply a `KeyboardEvent.key` value. Returns false for keys we don't track.
    pub fn set(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowUp" => &mut self.up,
            "ArrowDown" => &mut self.down,
            "ArrowLeft" => &mut self.left,
            "ArrowRight" => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Discrete direction; screen coordinates, so up is -y.
    pub fn vector(&self) -> (f64, f64) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f64;
        (axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Virtual joystick deflection, each component in [-1, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JoystickVec {
    pub dx: f64,
    pub dy: f64,
}

/// Geometry of the on-screen stick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Joystick {
    pub center: (f64, f64),
    pub max_distance: f64,
}

impl Joystick {
    pub fn new(center: (f64, f64), max_distance: f64) -> Self {
        Self { center, max_distance }
    }

    /// Handle offset from centre for a pointer at joystick-local `(x, y)`,
    /// clamped to the travel radius.
    pub fn handle_offset(&self, x: f64, y: f64) -> (f64, f64) {
        let mut dx = x - self.center.0;
        let mut dy = y - self.center.1;
        let dist = dx.hypot(dy);
        if dist > self.max_distance {
            let ratio = self.max_distance / dist;
            dx *= ratio;
            dy *= ratio;
        }
        (dx, dy)
    }

    pub fn deflection(&self, x: f64, y: f64) -> JoystickVec {
        let (dx, dy) = self.handle_offset(x, y);
        JoystickVec { dx: dx / self.max_distance, dy: dy / self.max_distance }
    }
}

/// Everything the tick reads about the player's intent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub keys: KeyState,
    pub joystick: JoystickVec,
    /// Pointer currently dragging the stick.
    pub joystick_active: bool,
}

impl InputState {
    pub fn release_joystick(&mut self) {
        self.joystick_active = false;
        self.joystick = JoystickVec::default();
    }

    pub fn direction(&self) -> Option<(f64, f64)> {
        fuse(&self.keys, self.joystick)
    }
}

/// Sum keyboard and joystick, then normalise so diagonals are not faster than
/// straight lines. `None` when there is no net input.
pub fn fuse(keys: &KeyState, joystick: JoystickVec) -> Option<(f64, f64)> {
    let (kx, ky) = keys.vector();
    let dx = kx + joystick.dx;
    let dy = ky + joystick.dy;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let mag = dx.hypot(dy);
    Some((dx / mag, dy / mag))
}
