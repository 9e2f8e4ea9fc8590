use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};

use ref_cast::RefCast;

/// The tokens not yet consumed by any spec.
///
/// This is a view over the parser's queue: specs may look at the front token
/// and take tokens from the front, nothing else.
#[derive(Debug, RefCast)]
#[repr(transparent)]
pub struct Tokens(VecDeque<OsString>);

impl Tokens {
    pub(crate) fn from_queue(queue: &mut VecDeque<OsString>) -> &mut Self {
        Self::ref_cast_mut(queue)
    }

    #[must_use]
    pub fn front(&self) -> Option<&OsStr> {
        self.0.front().map(OsString::as_os_str)
    }

    pub fn pop_front(&mut self) -> Option<OsString> {
        self.0.pop_front()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Take everything that is left.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = OsString> + '_ {
        self.0.drain(..)
    }
}

#[test]
fn view_pops_from_queue() {
    let mut queue: VecDeque<OsString> = ["-o", "out"].into_iter().map(Into::into).collect();
    let tokens = Tokens::from_queue(&mut queue);
    assert_eq!(tokens.front(), Some(OsStr::new("-o")));
    assert_eq!(tokens.pop_front(), Some("-o".into()));
    assert_eq!(tokens.len(), 1);
    assert_eq!(queue.len(), 1);
}
