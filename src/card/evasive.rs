use rand::Rng;
use serde::Serialize;

/// Messages shown above the "No" control after each relocation.
pub const TEASING_MESSAGES: [&str; 8] = [
    "Think again 🙂",
    "This could be a mistake!",
    "Are you sure? 😏",
    "Oops… missed me!",
    "Nice try 😜",
    "Wait, why? 🥺",
    "Error: Button shy 🙈",
    "Try the other one! 👉",
];

/// Offset of the control within the card container, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ButtonPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Geometry the relocation algorithm works within.
#[derive(Debug, Clone, Copy)]
pub struct CardLayout {
    pub container: Size,
    pub control: Size,
    pub padding: f32,
}

impl Default for CardLayout {
    fn default() -> Self {
        // The rendered card: max-w-md container, min 500px tall, with a
        // rounded-pill "No" button and a 24px keep-out margin.
        Self {
            container: Size {
                width: 448.0,
                height: 500.0,
            },
            control: Size {
                width: 96.0,
                height: 52.0,
            },
            padding: 24.0,
        }
    }
}

impl CardLayout {
    /// Where the control sits before anyone has interacted with it:
    /// right of center, down near the action row. Deterministic so the
    /// page looks static on load.
    pub fn initial_position(&self) -> ButtonPosition {
        ButtonPosition {
            x: self.container.width / 2.0 + 20.0,
            y: self.container.height - 120.0,
        }
    }

    /// Largest legal offset on each axis.
    pub fn max_offset(&self) -> (f32, f32) {
        (
            self.container.width - self.control.width - self.padding,
            self.container.height - self.control.height - self.padding,
        )
    }
}

/// Controller for the dismiss control that relocates on interaction.
///
/// The control never renders outside the container and never overlaps the
/// padding edge: every relocation lands in
/// `[padding, dimension - control - padding]` on both axes.
pub struct EvasiveButton {
    layout: CardLayout,
    position: ButtonPosition,
    message: Option<&'static str>,
    moved: bool,
}

impl EvasiveButton {
    pub fn new(layout: CardLayout) -> Self {
        let position = layout.initial_position();
        Self {
            layout,
            position,
            message: None,
            moved: false,
        }
    }

    pub fn position(&self) -> ButtonPosition {
        self.position
    }

    /// Teasing message from the last relocation, if any.
    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// False until the first relocation, while the control still sits at
    /// its deterministic mount position.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Compute a new random position confined to the card bounds and pick
    /// a teasing message uniformly from the fixed set.
    pub fn relocate(&mut self, rng: &mut impl Rng) -> (ButtonPosition, &'static str) {
        let (max_x, max_y) = self.layout.max_offset();

        let x = self.layout.padding.max(rng.random::<f32>() * max_x);
        let y = self.layout.padding.max(rng.random::<f32>() * max_y);

        let message = TEASING_MESSAGES[rng.random_range(0..TEASING_MESSAGES.len())];

        self.position = ButtonPosition { x, y };
        self.message = Some(message);
        self.moved = true;

        (self.position, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initial_position_is_deterministic() {
        let a = EvasiveButton::new(CardLayout::default());
        let b = EvasiveButton::new(CardLayout::default());

        assert_eq!(a.position(), b.position());
        assert!(!a.has_moved());
        assert_eq!(a.message(), None);
    }

    #[test]
    fn test_initial_position_adjacent_to_primary_action() {
        let layout = CardLayout::default();
        let pos = layout.initial_position();

        assert_eq!(pos.x, layout.container.width / 2.0 + 20.0);
        assert_eq!(pos.y, layout.container.height - 120.0);
    }

    #[test]
    fn test_relocate_marks_control_as_moved() {
        let mut button = EvasiveButton::new(CardLayout::default());
        let mut rng = StdRng::seed_from_u64(7);

        let (pos, message) = button.relocate(&mut rng);

        assert!(button.has_moved());
        assert_eq!(button.position(), pos);
        assert_eq!(button.message(), Some(message));
        assert!(TEASING_MESSAGES.contains(&message));
    }
}
