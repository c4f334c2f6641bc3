/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and save triggers.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    GemPicked { x: i32, y: i32 },
    ArtifactFound { id: usize },
    CheckpointBound { id: usize },
    RoomEntered { id: usize },
    PlayerHurt { amount: i32 },
    ShieldBroken,
    ShieldRestored,
    PlayerDying,
    PlayerRespawned,
    GameOver,
    ExtraLife,
    CircuitReleased { charge: i32 },
}
