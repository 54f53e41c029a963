pub mod connection;

pub use connection::connect_to_leetcode_page;
