/// Which click semantics the map currently applies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Clicks place start/end markers.
    #[default]
    Routing,
    /// Clicks draw obstacles.
    ObstacleEditing,
}

impl InteractionMode {
    pub fn is_obstacle_editing(self) -> bool {
        self == InteractionMode::ObstacleEditing
    }

    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::Routing => "routing",
            InteractionMode::ObstacleEditing => "obstacle editing",
        }
    }
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
