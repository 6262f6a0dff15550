//! # Command Encoding
//!
//! Purpose: Describe each catalog operation statically and build the
//! ordered token sequence for a single request.
//!
//! No quoting or escaping happens here: the wire codec length-prefixes
//! every token, so keys and values may contain whitespace, CR/LF, or
//! protocol prefix bytes without being split into extra tokens.

use crate::error::{ClientError, ClientResult};
use crate::reply::ReplyShape;
use crate::types::{KeyValuePair, ScoredMember};

/// Static descriptor for one catalog operation: the command keyword and the
/// shape its replies must match. Variadic forms share the descriptor of
/// their singular counterpart.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// Command keyword as sent on the wire.
    pub name: &'static str,
    /// Reply shape every reply to this command must have.
    pub shape: ReplyShape,
}

impl CommandSpec {
    /// Builds a descriptor; used for the `const` catalog entries.
    pub const fn new(name: &'static str, shape: ReplyShape) -> Self {
        CommandSpec { name, shape }
    }
}

/// Ordered token sequence for one request, keyword first.
#[derive(Debug)]
pub struct Command {
    spec: &'static CommandSpec,
    tokens: Vec<Vec<u8>>,
}

impl Command {
    /// Starts a request for the given descriptor.
    pub fn new(spec: &'static CommandSpec) -> Self {
        Command {
            spec,
            tokens: vec![spec.name.as_bytes().to_vec()],
        }
    }

    /// Appends one positional argument.
    pub fn arg(mut self, token: impl AsRef<[u8]>) -> Self {
        self.tokens.push(token.as_ref().to_vec());
        self
    }

    /// Appends one signed integer argument as its decimal token.
    pub fn int_arg(mut self, value: i64) -> Self {
        self.tokens.push(value.to_string().into_bytes());
        self
    }

    /// Appends one unsigned integer argument as its decimal token.
    pub fn uint_arg(mut self, value: u64) -> Self {
        self.tokens.push(value.to_string().into_bytes());
        self
    }

    /// Appends every element of a batch as one token each.
    ///
    /// An empty batch appends nothing: the command still goes out with zero
    /// trailing tokens and the store reports the arity error, not this
    /// layer.
    pub fn args<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for item in items {
            self.tokens.push(item.as_ref().to_vec());
        }
        self
    }

    /// Flattens key/value pairs into `key,value,key,value,...` tokens.
    pub fn pairs(mut self, pairs: &[KeyValuePair]) -> Self {
        for pair in pairs {
            self.tokens.push(pair.key.clone());
            self.tokens.push(pair.value.clone());
        }
        self
    }

    /// Flattens scored members into `score,member,score,member,...` tokens.
    pub fn scored(mut self, members: &[ScoredMember]) -> Self {
        for member in members {
            self.tokens.push(member.score.to_string().into_bytes());
            self.tokens.push(member.member.clone());
        }
        self
    }

    /// Appends an already-interleaved `key,value,...` token stream.
    ///
    /// An odd element count is rejected here, before anything reaches the
    /// wire: a half-paired request must never be sent. Evenness is checked
    /// over the flattened key+value stream, not over a keys collection.
    pub fn interleaved<T: AsRef<[u8]>>(self, tokens: &[T]) -> ClientResult<Self> {
        if tokens.len() % 2 != 0 {
            return Err(ClientError::MalformedBatch(
                "interleaved key/value stream has an odd element count",
            ));
        }
        Ok(self.args(tokens))
    }

    /// The static descriptor this request was built from.
    pub fn spec(&self) -> &'static CommandSpec {
        self.spec
    }

    /// Borrowed views over the tokens, in wire order.
    pub(crate) fn token_views(&self) -> Vec<&[u8]> {
        self.tokens.iter().map(Vec::as_slice).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE: CommandSpec = CommandSpec::new("PROBE", ReplyShape::Status);

    fn tokens(command: &Command) -> Vec<Vec<u8>> {
        command.tokens.clone()
    }

    #[test]
    fn keyword_is_first_token() {
        let command = Command::new(&PROBE).arg("key");
        assert_eq!(tokens(&command), vec![b"PROBE".to_vec(), b"key".to_vec()]);
    }

    #[test]
    fn integer_args_become_decimal_tokens() {
        let command = Command::new(&PROBE).int_arg(-5).uint_arg(30);
        assert_eq!(
            tokens(&command),
            vec![b"PROBE".to_vec(), b"-5".to_vec(), b"30".to_vec()]
        );
    }

    #[test]
    fn pairs_flatten_to_two_tokens_each_in_order() {
        let batch = vec![
            KeyValuePair::new("k1", "v1"),
            KeyValuePair::new("k2", "v2"),
            KeyValuePair::new("k3", "v3"),
        ];
        let command = Command::new(&PROBE).pairs(&batch);
        let built = tokens(&command);
        assert_eq!(built.len(), 1 + 2 * batch.len());
        assert_eq!(
            &built[1..],
            &[
                b"k1".to_vec(),
                b"v1".to_vec(),
                b"k2".to_vec(),
                b"v2".to_vec(),
                b"k3".to_vec(),
                b"v3".to_vec(),
            ]
        );
    }

    #[test]
    fn scored_members_flatten_score_first() {
        let batch = vec![ScoredMember::new(7, "a"), ScoredMember::new(-1, "b")];
        let command = Command::new(&PROBE).scored(&batch);
        assert_eq!(
            tokens(&command),
            vec![
                b"PROBE".to_vec(),
                b"7".to_vec(),
                b"a".to_vec(),
                b"-1".to_vec(),
                b"b".to_vec(),
            ]
        );
    }

    #[test]
    fn empty_batch_still_encodes_bare_command() {
        let command = Command::new(&PROBE).args(Vec::<Vec<u8>>::new());
        assert_eq!(tokens(&command), vec![b"PROBE".to_vec()]);
    }

    #[test]
    fn interleaved_accepts_even_streams() {
        let command = Command::new(&PROBE)
            .interleaved(&["k1", "v1", "k2", "v2"])
            .unwrap();
        assert_eq!(tokens(&command).len(), 5);
    }

    #[test]
    fn interleaved_rejects_odd_streams() {
        let result = Command::new(&PROBE).interleaved(&["k1", "v1", "k2"]);
        assert!(matches!(result, Err(ClientError::MalformedBatch(_))));
    }
}
