pub mod repost_relay;
