//! # Client Facade
//!
//! Purpose: One public operation per store command, each the same thin
//! composition: encode the token sequence, dispatch it over the transport
//! handle, validate the reply shape, map to the typed result.
//!
//! The facade has exactly two states: detached (no transport handle; every
//! operation fails with `NotConnected` before anything is encoded or sent)
//! and ready (handle present). It never tears the handle down itself.

use redpepper_wire::{Connection, ConnectionConfig, RespValue, WireError};

use crate::command::{Command, CommandSpec};
use crate::error::{ClientError, ClientResult};
use crate::reply::{self, ReplyShape};
use crate::types::{KeyValuePair, ScoredMember};

// Catalog of command descriptors. Variadic forms reuse the descriptor of
// their singular counterpart; only the encoding step differs.
const GET: CommandSpec = CommandSpec::new("GET", ReplyShape::Bulk);
const SET: CommandSpec = CommandSpec::new("SET", ReplyShape::Status);
const SETNX: CommandSpec = CommandSpec::new("SETNX", ReplyShape::Integer);
const SETEX: CommandSpec = CommandSpec::new("SETEX", ReplyShape::Status);
const INCR: CommandSpec = CommandSpec::new("INCR", ReplyShape::Integer);
const DEL: CommandSpec = CommandSpec::new("DEL", ReplyShape::Integer);
const EXISTS: CommandSpec = CommandSpec::new("EXISTS", ReplyShape::Integer);
const EXPIRE: CommandSpec = CommandSpec::new("EXPIRE", ReplyShape::Integer);
const TTL: CommandSpec = CommandSpec::new("TTL", ReplyShape::Integer);
const KEYS: CommandSpec = CommandSpec::new("KEYS", ReplyShape::Array);
const DBSIZE: CommandSpec = CommandSpec::new("DBSIZE", ReplyShape::Integer);
const MSET: CommandSpec = CommandSpec::new("MSET", ReplyShape::Status);
const MGET: CommandSpec = CommandSpec::new("MGET", ReplyShape::Array);
const PING: CommandSpec = CommandSpec::new("PING", ReplyShape::Status);

const SADD: CommandSpec = CommandSpec::new("SADD", ReplyShape::Integer);
const SREM: CommandSpec = CommandSpec::new("SREM", ReplyShape::Integer);
const SISMEMBER: CommandSpec = CommandSpec::new("SISMEMBER", ReplyShape::Integer);
const SMEMBERS: CommandSpec = CommandSpec::new("SMEMBERS", ReplyShape::Array);
const SPOP: CommandSpec = CommandSpec::new("SPOP", ReplyShape::Bulk);

const HSET: CommandSpec = CommandSpec::new("HSET", ReplyShape::Integer);
const HSETNX: CommandSpec = CommandSpec::new("HSETNX", ReplyShape::Integer);
const HMSET: CommandSpec = CommandSpec::new("HMSET", ReplyShape::Status);
const HMGET: CommandSpec = CommandSpec::new("HMGET", ReplyShape::Array);
const HGET: CommandSpec = CommandSpec::new("HGET", ReplyShape::Bulk);
const HGETALL: CommandSpec = CommandSpec::new("HGETALL", ReplyShape::PairArray);
const HEXISTS: CommandSpec = CommandSpec::new("HEXISTS", ReplyShape::Integer);
const HDEL: CommandSpec = CommandSpec::new("HDEL", ReplyShape::Integer);
const HKEYS: CommandSpec = CommandSpec::new("HKEYS", ReplyShape::Array);
const HVALS: CommandSpec = CommandSpec::new("HVALS", ReplyShape::Array);
const HLEN: CommandSpec = CommandSpec::new("HLEN", ReplyShape::Integer);
const HINCRBY: CommandSpec = CommandSpec::new("HINCRBY", ReplyShape::Integer);

const LPUSH: CommandSpec = CommandSpec::new("LPUSH", ReplyShape::Integer);
const LPUSHX: CommandSpec = CommandSpec::new("LPUSHX", ReplyShape::Integer);
const RPUSH: CommandSpec = CommandSpec::new("RPUSH", ReplyShape::Integer);
const LLEN: CommandSpec = CommandSpec::new("LLEN", ReplyShape::Integer);
const LRANGE: CommandSpec = CommandSpec::new("LRANGE", ReplyShape::Array);
const LPOP: CommandSpec = CommandSpec::new("LPOP", ReplyShape::Bulk);
const RPOP: CommandSpec = CommandSpec::new("RPOP", ReplyShape::Bulk);
const LTRIM: CommandSpec = CommandSpec::new("LTRIM", ReplyShape::Status);

const ZADD: CommandSpec = CommandSpec::new("ZADD", ReplyShape::Integer);
const ZREM: CommandSpec = CommandSpec::new("ZREM", ReplyShape::Integer);
const ZCARD: CommandSpec = CommandSpec::new("ZCARD", ReplyShape::Integer);
const ZSCORE: CommandSpec = CommandSpec::new("ZSCORE", ReplyShape::Bulk);
const ZRANGEBYSCORE: CommandSpec = CommandSpec::new("ZRANGEBYSCORE", ReplyShape::Array);
const ZREMRANGEBYSCORE: CommandSpec = CommandSpec::new("ZREMRANGEBYSCORE", ReplyShape::Integer);

/// Blocking, strongly-typed client for one store connection.
///
/// One command is in flight at a time; `&mut self` on every operation makes
/// the caller serialize access at compile time. Sharing a client across
/// threads requires external synchronization.
pub struct Client {
    config: ConnectionConfig,
    conn: Option<Connection>,
}

impl Client {
    /// Creates a detached client with default configuration. No connection
    /// is made until [`connect`](Self::connect).
    pub fn new() -> Self {
        Client::with_config(ConnectionConfig::default())
    }

    /// Creates a detached client with the provided configuration.
    pub fn with_config(config: ConnectionConfig) -> Self {
        Client { config, conn: None }
    }

    /// Creates a client for `addr` and connects immediately.
    pub fn connect_to(addr: impl Into<String>) -> ClientResult<Self> {
        let config = ConnectionConfig {
            addr: addr.into(),
            ..ConnectionConfig::default()
        };
        let mut client = Client::with_config(config);
        client.connect()?;
        Ok(client)
    }

    /// Establishes the transport handle. Until this succeeds every
    /// operation fails with `NotConnected` without touching the network.
    pub fn connect(&mut self) -> ClientResult<()> {
        self.conn = Some(Connection::connect(&self.config)?);
        Ok(())
    }

    /// True once a transport handle is present.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    // ---------------------------------------------------------------------
    // Strings and key management
    // ---------------------------------------------------------------------

    /// Fetches a value by key. `Ok(None)` when the key is missing.
    pub fn get(&mut self, key: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.exec_bulk(Command::new(&GET).arg(key))
    }

    /// Stores a value under a key. True iff the store acknowledged with OK.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> ClientResult<bool> {
        self.exec_status(Command::new(&SET).arg(key).arg(value))
    }

    /// Stores a value only if the key does not exist yet. True on first
    /// write, false when the key was already present.
    pub fn setnx(&mut self, key: &[u8], value: &[u8]) -> ClientResult<bool> {
        self.exec_flag(Command::new(&SETNX).arg(key).arg(value))
    }

    /// Stores a value with an expiration in seconds.
    pub fn setex(&mut self, key: &[u8], seconds: u64, value: &[u8]) -> ClientResult<bool> {
        self.exec_status(Command::new(&SETEX).arg(key).uint_arg(seconds).arg(value))
    }

    /// Increments the integer value of a key; returns the new value.
    pub fn incr(&mut self, key: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&INCR).arg(key))
    }

    /// Deletes a key. Returns the number of keys removed (0 when absent).
    pub fn del(&mut self, key: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&DEL).arg(key))
    }

    /// Deletes several keys at once; returns the number actually removed.
    pub fn del_many<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&DEL).args(keys))
    }

    /// Reports key presence: 1 when present, 0 when absent.
    pub fn exists(&mut self, key: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&EXISTS).arg(key))
    }

    /// Sets a time-to-live in seconds. Returns the store's 1/0 count.
    pub fn expire(&mut self, key: &[u8], seconds: u64) -> ClientResult<i64> {
        self.exec_integer(Command::new(&EXPIRE).arg(key).uint_arg(seconds))
    }

    /// Remaining time-to-live in seconds, passed through unmodified
    /// (including the store's negative no-expiry/missing conventions).
    pub fn ttl(&mut self, key: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&TTL).arg(key))
    }

    /// All keys matching a glob pattern.
    pub fn keys(&mut self, pattern: &[u8]) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&KEYS).arg(pattern))
    }

    /// Number of keys in the current database.
    pub fn dbsize(&mut self) -> ClientResult<i64> {
        self.exec_integer(Command::new(&DBSIZE))
    }

    /// Stores several key/value pairs in one request.
    pub fn mset(&mut self, pairs: &[KeyValuePair]) -> ClientResult<bool> {
        self.exec_status(Command::new(&MSET).pairs(pairs))
    }

    /// Stores several keys from an already-interleaved `key,value,...`
    /// token stream. An odd element count fails with `MalformedBatch`
    /// before anything is sent; a missing connection outranks that check.
    pub fn mset_interleaved<T: AsRef<[u8]>>(&mut self, tokens: &[T]) -> ClientResult<bool> {
        self.transport()?;
        let command = Command::new(&MSET).interleaved(tokens)?;
        self.exec_status(command)
    }

    /// Fetches several keys at once. The reply preserves key order; absent
    /// keys surface as empty strings at their position.
    pub fn mget<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&MGET).args(keys))
    }

    /// Pings the server; returns the raw reply payload.
    pub fn ping(&mut self) -> ClientResult<Vec<u8>> {
        let reply = self.dispatch(Command::new(&PING))?;
        reply::expect_text(reply)
    }

    // ---------------------------------------------------------------------
    // Sets
    // ---------------------------------------------------------------------

    /// Adds one member to a set; returns the number of members added.
    pub fn sadd(&mut self, key: &[u8], member: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&SADD).arg(key).arg(member))
    }

    /// Adds several members to a set in one request.
    pub fn sadd_many<M: AsRef<[u8]>>(&mut self, key: &[u8], members: &[M]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&SADD).arg(key).args(members))
    }

    /// Removes one member from a set; returns the number removed.
    pub fn srem(&mut self, key: &[u8], member: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&SREM).arg(key).arg(member))
    }

    /// True when the member belongs to the set.
    pub fn sismember(&mut self, key: &[u8], member: &[u8]) -> ClientResult<bool> {
        self.exec_flag(Command::new(&SISMEMBER).arg(key).arg(member))
    }

    /// All members of a set.
    pub fn smembers(&mut self, key: &[u8]) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&SMEMBERS).arg(key))
    }

    /// Removes and returns one member. `Ok(None)` when the set is empty.
    pub fn spop(&mut self, key: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.exec_bulk(Command::new(&SPOP).arg(key))
    }

    // ---------------------------------------------------------------------
    // Hashes
    // ---------------------------------------------------------------------

    /// Sets one hash field. Returns 1 for a new field, 0 for an overwrite.
    pub fn hset(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&HSET).arg(key).arg(field).arg(value))
    }

    /// Sets one hash field only if it does not exist yet.
    pub fn hsetnx(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> ClientResult<bool> {
        self.exec_flag(Command::new(&HSETNX).arg(key).arg(field).arg(value))
    }

    /// Sets several hash fields in one request.
    pub fn hmset(&mut self, key: &[u8], pairs: &[KeyValuePair]) -> ClientResult<bool> {
        self.exec_status(Command::new(&HMSET).arg(key).pairs(pairs))
    }

    /// Fetches several hash fields at once. Field order is preserved;
    /// absent fields surface as empty strings at their position.
    pub fn hmget<F: AsRef<[u8]>>(&mut self, key: &[u8], fields: &[F]) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&HMGET).arg(key).args(fields))
    }

    /// Fetches one hash field. `Ok(None)` when key or field is missing.
    pub fn hget(&mut self, key: &[u8], field: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.exec_bulk(Command::new(&HGET).arg(key).arg(field))
    }

    /// All fields and values of a hash, as pairs.
    pub fn hgetall(&mut self, key: &[u8]) -> ClientResult<Vec<KeyValuePair>> {
        self.exec_pairs(Command::new(&HGETALL).arg(key))
    }

    /// True when the hash field exists.
    pub fn hexists(&mut self, key: &[u8], field: &[u8]) -> ClientResult<bool> {
        self.exec_flag(Command::new(&HEXISTS).arg(key).arg(field))
    }

    /// Deletes one hash field; returns the number of fields removed.
    pub fn hdel(&mut self, key: &[u8], field: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&HDEL).arg(key).arg(field))
    }

    /// Deletes several hash fields in one request.
    pub fn hdel_many<F: AsRef<[u8]>>(&mut self, key: &[u8], fields: &[F]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&HDEL).arg(key).args(fields))
    }

    /// All field names of a hash.
    pub fn hkeys(&mut self, key: &[u8]) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&HKEYS).arg(key))
    }

    /// All values of a hash.
    pub fn hvals(&mut self, key: &[u8]) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&HVALS).arg(key))
    }

    /// Number of fields in a hash.
    pub fn hlen(&mut self, key: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&HLEN).arg(key))
    }

    /// Increments a hash field by `delta`; returns the new value.
    pub fn hincrby(&mut self, key: &[u8], field: &[u8], delta: i64) -> ClientResult<i64> {
        self.exec_integer(Command::new(&HINCRBY).arg(key).arg(field).int_arg(delta))
    }

    // ---------------------------------------------------------------------
    // Lists
    // ---------------------------------------------------------------------

    /// Prepends one value; returns the list length afterwards.
    pub fn lpush(&mut self, key: &[u8], value: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&LPUSH).arg(key).arg(value))
    }

    /// Prepends several values in one request.
    pub fn lpush_many<V: AsRef<[u8]>>(&mut self, key: &[u8], values: &[V]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&LPUSH).arg(key).args(values))
    }

    /// Prepends only when the list already exists.
    pub fn lpushx(&mut self, key: &[u8], value: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&LPUSHX).arg(key).arg(value))
    }

    /// Appends one value; returns the list length afterwards.
    pub fn rpush(&mut self, key: &[u8], value: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&RPUSH).arg(key).arg(value))
    }

    /// Appends several values in one request.
    pub fn rpush_many<V: AsRef<[u8]>>(&mut self, key: &[u8], values: &[V]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&RPUSH).arg(key).args(values))
    }

    /// Length of a list.
    pub fn llen(&mut self, key: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&LLEN).arg(key))
    }

    /// Elements between `start` and `stop` inclusive, in list order.
    pub fn lrange(&mut self, key: &[u8], start: i64, stop: i64) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&LRANGE).arg(key).int_arg(start).int_arg(stop))
    }

    /// Removes and returns the head element. `Ok(None)` on an empty list.
    pub fn lpop(&mut self, key: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.exec_bulk(Command::new(&LPOP).arg(key))
    }

    /// Removes and returns the tail element. `Ok(None)` on an empty list.
    pub fn rpop(&mut self, key: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.exec_bulk(Command::new(&RPOP).arg(key))
    }

    /// Trims a list to the given inclusive range.
    pub fn ltrim(&mut self, key: &[u8], start: i64, stop: i64) -> ClientResult<bool> {
        self.exec_status(Command::new(&LTRIM).arg(key).int_arg(start).int_arg(stop))
    }

    // ---------------------------------------------------------------------
    // Sorted sets
    // ---------------------------------------------------------------------

    /// Adds one scored member; returns the number of members added.
    pub fn zadd(&mut self, key: &[u8], score: i64, member: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&ZADD).arg(key).int_arg(score).arg(member))
    }

    /// Adds several scored members in one request.
    pub fn zadd_many(&mut self, key: &[u8], members: &[ScoredMember]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&ZADD).arg(key).scored(members))
    }

    /// Removes one member; returns the number removed.
    pub fn zrem(&mut self, key: &[u8], member: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&ZREM).arg(key).arg(member))
    }

    /// Removes several members in one request.
    pub fn zrem_many<M: AsRef<[u8]>>(&mut self, key: &[u8], members: &[M]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&ZREM).arg(key).args(members))
    }

    /// Number of members in a sorted set.
    pub fn zcard(&mut self, key: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&ZCARD).arg(key))
    }

    /// Score of a member as raw bytes. `Ok(None)` when the member is
    /// missing.
    pub fn zscore(&mut self, key: &[u8], member: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.exec_bulk(Command::new(&ZSCORE).arg(key).arg(member))
    }

    /// Members with scores within `[min, max]`, in score order. Bounds are
    /// passed through verbatim so `-inf`, `+inf` and exclusive `(n` forms
    /// work.
    pub fn zrangebyscore(&mut self, key: &[u8], min: &[u8], max: &[u8]) -> ClientResult<Vec<Vec<u8>>> {
        self.exec_strings(Command::new(&ZRANGEBYSCORE).arg(key).arg(min).arg(max))
    }

    /// Removes members with scores within `[min, max]`; returns the count.
    pub fn zremrangebyscore(&mut self, key: &[u8], min: &[u8], max: &[u8]) -> ClientResult<i64> {
        self.exec_integer(Command::new(&ZREMRANGEBYSCORE).arg(key).arg(min).arg(max))
    }

    // ---------------------------------------------------------------------
    // Composition plumbing
    // ---------------------------------------------------------------------

    fn transport(&mut self) -> ClientResult<&mut Connection> {
        self.conn
            .as_mut()
            .ok_or(ClientError::NotConnected(WireError::NotEstablished))
    }

    fn dispatch(&mut self, command: Command) -> ClientResult<RespValue> {
        let conn = self.transport()?;
        Ok(conn.dispatch(&command.token_views())?)
    }

    fn exec_status(&mut self, command: Command) -> ClientResult<bool> {
        debug_assert_eq!(command.spec().shape, ReplyShape::Status);
        let reply = self.dispatch(command)?;
        reply::expect_status(reply)
    }

    fn exec_integer(&mut self, command: Command) -> ClientResult<i64> {
        debug_assert_eq!(command.spec().shape, ReplyShape::Integer);
        let reply = self.dispatch(command)?;
        reply::expect_integer(reply)
    }

    fn exec_flag(&mut self, command: Command) -> ClientResult<bool> {
        debug_assert_eq!(command.spec().shape, ReplyShape::Integer);
        let reply = self.dispatch(command)?;
        reply::expect_flag(reply)
    }

    fn exec_bulk(&mut self, command: Command) -> ClientResult<Option<Vec<u8>>> {
        debug_assert_eq!(command.spec().shape, ReplyShape::Bulk);
        let reply = self.dispatch(command)?;
        reply::expect_bulk(reply)
    }

    fn exec_strings(&mut self, command: Command) -> ClientResult<Vec<Vec<u8>>> {
        debug_assert_eq!(command.spec().shape, ReplyShape::Array);
        let reply = self.dispatch(command)?;
        reply::expect_strings(reply)
    }

    fn exec_pairs(&mut self, command: Command) -> ClientResult<Vec<KeyValuePair>> {
        debug_assert_eq!(command.spec().shape, ReplyShape::PairArray);
        let reply = self.dispatch(command)?;
        reply::expect_pairs(reply)
    }
}

impl Default for Client {
    fn default() -> Self {
        Client::new()
    }
}
