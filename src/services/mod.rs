pub mod oauth;
pub mod playlist_export;
pub mod providers;
pub mod recommendations;
pub mod seeds;
pub mod session;
pub mod suggestions;

pub use oauth::{GoogleOAuth, OAuthProvider};
pub use providers::{VideoPlatform, YouTubeClient};
pub use recommendations::{derive_recommendations, DiscoverySettings};
