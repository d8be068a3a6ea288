/// One of the two fixed preview positions. Each slot owns one selection
/// control and one video surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Slot> {
        match index {
            0 => Some(Slot::First),
            1 => Some(Slot::Second),
            _ => None,
        }
    }

    /// Id of the slot's selection control, e.g. `cameraSelect1`.
    pub fn select_id(self) -> String {
        format!("cameraSelect{}", self.index() + 1)
    }

    /// Id of the slot's video surface, e.g. `video1`.
    pub fn video_id(self) -> String {
        format!("video{}", self.index() + 1)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot {}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;

    #[test]
    fn test_index_round_trip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_index(slot.index()), Some(slot));
        }
        assert_eq!(Slot::from_index(2), None);
    }

    #[test]
    fn test_element_ids() {
        assert_eq!(Slot::First.select_id(), "cameraSelect1");
        assert_eq!(Slot::Second.video_id(), "video2");
    }
}
