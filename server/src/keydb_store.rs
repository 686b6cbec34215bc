//! KeyDB-backed storage for the tames catalog and tracked pets.
//!
//! Rows are stored as bincode-encoded blobs in hashes.
//!
//! Key schema:
//! - `beastmaster:tames`: hash, field = entry, value = bincode `TameRow`
//! - `beastmaster:tamed:{owner}`: hash, field = entry, value = bincode `TrackedPetRecord`

use std::collections::HashMap;

use bincode::{Decode, Encode};
use bm_core::types::{sort_newest_first, PlayerId, TameRow, TrackedPetRecord};
use redis::{pipe, Commands, Connection};

use crate::keydb;
use crate::repository::{StoreError, TameSource, TamedPetRepository};

pub const TAMES_KEY: &str = "beastmaster:tames";

/// Number of rows written per pipeline round-trip when seeding.
const PIPELINE_BATCH_SIZE: usize = 512;

fn tamed_key(owner: PlayerId) -> String {
    format!("beastmaster:tamed:{owner}")
}

fn encode_bincode<T: Encode>(val: &T) -> Result<Vec<u8>, StoreError> {
    bincode::encode_to_vec(val, bincode::config::standard())
        .map_err(|e| StoreError::Query(format!("encode: {e}")))
}

fn decode_bincode<T: Decode<()>>(key: &str, bytes: &[u8]) -> Result<T, StoreError> {
    let (val, _consumed) = bincode::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|e| StoreError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    Ok(val)
}

fn query_error(command: &str, key: &str, err: redis::RedisError) -> StoreError {
    StoreError::Query(format!("KeyDB {command} {key} failed: {err}"))
}

/// Storage backend talking to KeyDB. Opens a connection per call, so one
/// instance can be shared by every session.
pub struct KeyDbStore {
    client: redis::Client,
}

impl KeyDbStore {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(KeyDbStore {
            client: keydb::open_client(url)?,
        })
    }

    fn connection(&self) -> Result<Connection, StoreError> {
        keydb::connect(&self.client)
    }

    /// Whether the tames hash exists at all.
    pub fn has_tames(&self) -> Result<bool, StoreError> {
        let mut con = self.connection()?;
        con.exists(TAMES_KEY)
            .map_err(|e| query_error("EXISTS", TAMES_KEY, e))
    }

    /// Writes `rows` into the tames hash, replacing it when `replace` is set.
    pub fn save_tames(&self, rows: &[TameRow], replace: bool) -> Result<usize, StoreError> {
        let mut con = self.connection()?;
        if replace {
            con.del::<_, ()>(TAMES_KEY)
                .map_err(|e| query_error("DEL", TAMES_KEY, e))?;
        }

        for batch in rows.chunks(PIPELINE_BATCH_SIZE) {
            let mut pipeline = pipe();
            for row in batch {
                pipeline
                    .cmd("HSET")
                    .arg(TAMES_KEY)
                    .arg(row.entry)
                    .arg(encode_bincode(row)?);
            }
            pipeline
                .query::<()>(&mut con)
                .map_err(|e| query_error("pipeline HSET", TAMES_KEY, e))?;
        }

        Ok(rows.len())
    }
}

impl TameSource for KeyDbStore {
    fn load_tames(&self) -> Result<Vec<TameRow>, StoreError> {
        let mut con = self.connection()?;
        let exists: bool = con
            .exists(TAMES_KEY)
            .map_err(|e| query_error("EXISTS", TAMES_KEY, e))?;
        if !exists {
            return Err(StoreError::MissingTable("beastmaster_tames"));
        }

        let raw: HashMap<u32, Vec<u8>> = con
            .hgetall(TAMES_KEY)
            .map_err(|e| query_error("HGETALL", TAMES_KEY, e))?;

        let mut rows = Vec::with_capacity(raw.len());
        for (entry, bytes) in raw {
            let row: TameRow = decode_bincode(&format!("{TAMES_KEY}:{entry}"), &bytes)?;
            rows.push(row);
        }
        rows.sort_by_key(|row| row.entry);
        Ok(rows)
    }
}

impl TamedPetRepository for KeyDbStore {
    fn insert(&self, record: &TrackedPetRecord) -> Result<bool, StoreError> {
        let mut con = self.connection()?;
        let key = tamed_key(record.owner_id);
        con.hset_nx(&key, record.entry, encode_bincode(record)?)
            .map_err(|e| query_error("HSETNX", &key, e))
    }

    fn rename(&self, owner: PlayerId, entry: u32, name: &str) -> Result<bool, StoreError> {
        let Some(mut record) = self.find(owner, entry)? else {
            return Ok(false);
        };
        record.name = name.to_string();

        let mut con = self.connection()?;
        let key = tamed_key(owner);
        con.hset::<_, _, _, ()>(&key, entry, encode_bincode(&record)?)
            .map_err(|e| query_error("HSET", &key, e))?;
        Ok(true)
    }

    fn delete(&self, owner: PlayerId, entry: u32) -> Result<bool, StoreError> {
        let mut con = self.connection()?;
        let key = tamed_key(owner);
        let removed: u32 = con
            .hdel(&key, entry)
            .map_err(|e| query_error("HDEL", &key, e))?;
        Ok(removed > 0)
    }

    fn count(&self, owner: PlayerId) -> Result<u32, StoreError> {
        let mut con = self.connection()?;
        let key = tamed_key(owner);
        con.hlen(&key).map_err(|e| query_error("HLEN", &key, e))
    }

    fn list(&self, owner: PlayerId) -> Result<Vec<TrackedPetRecord>, StoreError> {
        let mut con = self.connection()?;
        let key = tamed_key(owner);
        let blobs: Vec<Vec<u8>> = con.hvals(&key).map_err(|e| query_error("HVALS", &key, e))?;

        let mut records = blobs
            .iter()
            .map(|bytes| decode_bincode::<TrackedPetRecord>(&key, bytes))
            .collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn find(&self, owner: PlayerId, entry: u32) -> Result<Option<TrackedPetRecord>, StoreError> {
        let mut con = self.connection()?;
        let key = tamed_key(owner);
        let bytes: Option<Vec<u8>> = con
            .hget(&key, entry)
            .map_err(|e| query_error("HGET", &key, e))?;
        bytes
            .map(|bytes| decode_bincode(&key, &bytes))
            .transpose()
    }
}
