// =============================================================================
// DevMatch Backend Constants
// =============================================================================
// This file contains all constants used throughout the backend to enable
// easy tuning and configuration from a single location.

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default HTTP/WebSocket listen port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Default database URL when DATABASE_URL is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://devmatch.db";

/// Default maximum pooled database connections
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// REALTIME CHANNEL
// =============================================================================

/// Sentinel room for connections that failed credential verification.
/// Frames on this room are never relayed.
pub const ROOM_UNAUTHENTICATED: i64 = 0;

/// Per-connection outbound queue depth; broadcasts beyond this are dropped
/// rather than stalling the sender
pub const WS_SEND_QUEUE_CAPACITY: usize = 32;

/// Frame type accepted for relay
pub const CHAT_FRAME_TYPE: &str = "chat_message";

// =============================================================================
// CONNECTION CREDENTIALS
// =============================================================================

/// Maximum age of a realtime connection token before verification rejects it
pub const REALTIME_TOKEN_TTL_SECS: i64 = 3600;
