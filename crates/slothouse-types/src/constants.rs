//! System-wide constants for the SlotHouse auction engine.

/// Denominator for all basis-point math (100% = 10 000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Platform fee must stay strictly below this value (10%).
pub const MAX_PLATFORM_FEE_BPS: u32 = 1_000;

/// Default upper bound on the number of slots in one auction.
pub const DEFAULT_MAX_SLOTS: u32 = 2_000;

/// Default maximum number of items held by a single slot.
pub const DEFAULT_MAX_ITEMS_PER_SLOT: usize = 100;

/// Default maximum number of items moved by a single deposit, claim, or withdrawal call.
pub const DEFAULT_MAX_ITEMS_PER_CALL: usize = 40;

/// Default platform fee in basis points.
pub const DEFAULT_PLATFORM_FEE_BPS: u32 = 0;

/// Domain prefix for the SHA-256 ranking root.
pub const RANKING_ROOT_DOMAIN: &[u8] = b"slothouse:ranking_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SlotHouse";
