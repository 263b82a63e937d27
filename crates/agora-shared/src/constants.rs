/// Application name
pub const APP_NAME: &str = "Agora";

/// Display name of the local, simulated user
pub const LOCAL_USER_NAME: &str = "You";

/// Avatar of the local user
pub const LOCAL_USER_AVATAR: &str = "/self.png";

/// Maximum length of a micro-post, in characters
pub const MAX_POST_CHARS: usize = 280;

/// Maximum length of any other free-text entry, in characters
pub const MAX_TEXT_CHARS: usize = 2_000;

/// Poll option bounds
pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = 8;

/// Poll chart palette, cycled by option index
pub const POLL_COLORS: [&str; 8] = [
    "#4285F4", "#EA4335", "#FBBC05", "#34A853", "#FF6D01", "#46BDC6", "#7B61FF", "#1DA462",
];

/// Posts generated per infinite-scroll page
pub const FEED_PAGE_SIZE: usize = 5;

/// Last page the infinite-scroll feed will load
pub const FEED_MAX_PAGES: u32 = 5;

/// Simulated latency of a feed page fetch in milliseconds
pub const FEED_FETCH_DELAY_MS: u64 = 1_000;

/// Idle time after the last keystroke before the local typing flag clears
pub const TYPING_CLEAR_DELAY_MS: u64 = 2_000;

/// Delay before a typing remote user "sends" their scripted message
pub const REMOTE_REPLY_DELAY_MS: u64 = 3_000;

/// Lifetime of a floating like marker in milliseconds
pub const MARKER_LIFETIME_MS: u64 = 2_000;

/// Emojis a like burst picks from
pub const LIKE_EMOJIS: [&str; 5] = ["❤️", "👍", "🔥", "🎉", "👏"];

/// Horizontal placement range of like markers, in percent of the post width
pub const MARKER_X_MIN: f64 = 10.0;
pub const MARKER_X_MAX: f64 = 90.0;

/// Message a typing remote user sends when their reply timer fires
pub const SCRIPTED_REPLY: &str = "I just finished my 9 to 5";
