//! Annotation selection state.

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Idle,
    Selected { annotation: Coordinate, generation: u64 },
}

/// Result of feeding a tap into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entered `Selected`; a query tagged with `generation` should be issued.
    Entered {
        annotation: Coordinate,
        generation: u64,
        previous: Option<Coordinate>,
    },
    /// Returned to `Idle`, leaving `annotation`.
    Left { annotation: Coordinate },
    /// Nothing was selected.
    Unchanged,
}

/// Two-state selection machine.
///
/// Every transition bumps the generation, so a completion tagged with an
/// older generation belongs to a selection that no longer exists.
#[derive(Debug)]
pub struct SelectionMachine {
    state: Selection,
    generation: u64,
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self {
            state: Selection::Idle,
            generation: 0,
        }
    }
}

impl SelectionMachine {
    pub fn state(&self) -> Selection {
        self.state
    }

    pub fn selected(&self) -> Option<Coordinate> {
        match self.state {
            Selection::Idle => None,
            Selection::Selected { annotation, .. } => Some(annotation),
        }
    }

    /// Tap on `annotation`. Tapping the current selection again deselects it.
    pub fn tap(&mut self, annotation: Coordinate) -> Transition {
        let previous = self.selected();
        if previous == Some(annotation) {
            return self.clear();
        }

        self.generation += 1;
        self.state = Selection::Selected {
            annotation,
            generation: self.generation,
        };
        Transition::Entered {
            annotation,
            generation: self.generation,
            previous,
        }
    }

    /// Tap elsewhere or explicit deselect.
    pub fn clear(&mut self) -> Transition {
        match self.state {
            Selection::Idle => Transition::Unchanged,
            Selection::Selected { annotation, .. } => {
                self.generation += 1;
                self.state = Selection::Idle;
                Transition::Left { annotation }
            }
        }
    }

    /// Whether a completion issued for (`annotation`, `generation`) still applies.
    pub fn is_current(&self, annotation: Coordinate, generation: u64) -> bool {
        self.state
            == Selection::Selected {
                annotation,
                generation,
            }
    }
}
