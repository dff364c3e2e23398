/// Visibility state of the navigation panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Open,
}

#[allow(clippy::derivable_impls)]
impl Default for NavState {
    fn default() -> Self {
        NavState::Closed
    }
}

impl NavState {
    pub fn is_open(self) -> bool {
        self == NavState::Open
    }

    /// The state an activation of the toggle control moves to.
    pub fn toggled(self) -> Self {
        match self {
            NavState::Closed => NavState::Open,
            NavState::Open => NavState::Closed,
        }
    }

    /// Value written to the toggle control's `aria-expanded` attribute.
    pub fn aria_expanded(self) -> &'static str {
        match self {
            NavState::Closed => "false",
            NavState::Open => "true",
        }
    }
}
