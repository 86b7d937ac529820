pub mod connection_string;
pub mod db;
pub mod server_version;
pub mod health {
    pub mod probe;
}
