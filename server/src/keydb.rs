use crate::repository::StoreError;

pub const DEFAULT_KEYDB_URL: &str = "redis://127.0.0.1:5556/";

pub fn open_client(url: &str) -> Result<redis::Client, StoreError> {
    redis::Client::open(url)
        .map_err(|err| StoreError::Unavailable(format!("failed to open KeyDB client: {err}")))
}

pub fn connect(client: &redis::Client) -> Result<redis::Connection, StoreError> {
    client
        .get_connection()
        .map_err(|err| StoreError::Unavailable(format!("failed to connect to KeyDB: {err}")))
}
