use thiserror::Error;

/// Failures of the guest bridge. Only load failures and guest faults are fatal
/// to an instance; everything else is handled in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("failed to load guest module: {0}")]
    LoadFailure(String),
    #[error("guest module has no `{0}` export")]
    MissingExport(String),
    #[error("guest signalled a panic")]
    GuestPanic,
    #[error("guest trapped: {0}")]
    GuestTrap(String),
    #[error("pixel buffer {ptr:#x}+{len} does not fit in {memory_len} bytes of guest memory")]
    PixelBufferOutOfBounds {
        ptr: usize,
        len: usize,
        memory_len: usize,
    },
    #[error("pixel buffer {width}x{height} exceeds the supported size")]
    PixelBufferTooLarge { width: u32, height: u32 },
    #[error("guest memory read {offset:#x}+{len} is out of bounds")]
    MemoryOutOfBounds { offset: usize, len: usize },
    #[error("invalid bridge transition from {from} on {event}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for `{key}`")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown logical button {0:?}")]
    UnknownButton(String),
    #[error("malformed key mapping entry {0:?}, expected `Code=BUTTON`")]
    MalformedMapping(String),
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
    #[error("logical size must be non-zero, got {width}x{height}")]
    ZeroLogicalSize { width: u32, height: u32 },
    #[error("logical size {width}x{height} exceeds {max} on an edge")]
    LogicalSizeTooLarge { width: u32, height: u32, max: u32 },
    #[error("dead zone must be in [0, 1), got {0}")]
    DeadZoneOutOfRange(f32),
}
