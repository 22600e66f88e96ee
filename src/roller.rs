//! The advancement algorithm shared by every hasher.
//!
//! A [`Roller`] owns a window position over a [`WindowSource`] and the
//! state of a [`HashEngine`].  It decides *when* to shift, jump or
//! re‑initialise; the engine decides *what* a shift does to its
//! accumulators.  [`NtHash`](crate::NtHash), [`BlindNtHash`](crate::BlindNtHash)
//! and [`SeedNtHash`](crate::SeedNtHash) are thin wrappers around one
//! `Roller` each.
//!
//! Rules, for both directions:
//!
//! - From an uninitialised state, search for the nearest valid window at or
//!   after (`roll`) / at or before (`roll_back`) the current position.  A
//!   window with an invalid base is skipped in one jump past that base.
//! - From an initialised state, an invalid incoming base moves the window a
//!   full `k` and searches again; otherwise the engine shifts in O(1).
//! - When no valid window is left, `pos` becomes [`NO_POS`].
//! - Peeks shift a copy of the state and only write the hash buffer.

use crate::{
    constants::{SEED_N, SEED_TAB},
    window::WindowSource,
    NtHashError, Result,
};

/// Position reported once no valid window is left.
pub const NO_POS: usize = usize::MAX;

/// Largest supported window length.
pub const K_MAX: usize = u16::MAX as usize;

/// Largest supported number of hashes per window (per seed for spaced seeds).
pub const HASH_NUM_MAX: usize = u8::MAX as usize;

#[inline(always)]
pub(crate) fn is_invalid(c: u8) -> bool {
    SEED_TAB[c as usize] == SEED_N
}

/// Index of the last invalid base in `window`, if any.
#[inline]
pub(crate) fn last_invalid(window: &[u8]) -> Option<usize> {
    window.iter().rposition(|&c| is_invalid(c))
}

/// Index of the first invalid base in `window`, if any.
#[inline]
pub(crate) fn first_invalid(window: &[u8]) -> Option<usize> {
    window.iter().position(|&c| is_invalid(c))
}

/// Validated construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Params {
    pub(crate) k: u16,
    pub(crate) hash_num: u8,
}

impl Params {
    /// Check `k` / `hash_num` against their hard limits.
    ///
    /// `hash_num >= k` is accepted but logged: real workloads use a handful
    /// of hashes for k‑mers in the tens, so the reverse usually means the two
    /// arguments were swapped.
    pub(crate) fn new(who: &'static str, k: usize, hash_num: usize) -> Result<Self> {
        if k == 0 {
            return Err(NtHashError::InvalidK);
        }
        let k16 = u16::try_from(k).map_err(|_| NtHashError::KTooLarge { k })?;
        let hash_num8 =
            u8::try_from(hash_num).map_err(|_| NtHashError::HashNumTooLarge { hash_num })?;
        if hash_num >= k {
            tracing::warn!(
                hasher = who,
                hash_num,
                k,
                "number of hashes is not smaller than k; were the arguments permuted?"
            );
        }
        Ok(Self {
            k: k16,
            hash_num: hash_num8,
        })
    }
}

/// Direction of a one‑base move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

/// Hash state that can be computed for a window and shifted by one base.
pub(crate) trait HashEngine {
    type State: Clone + std::fmt::Debug;

    fn empty_state(&self) -> Self::State;

    /// Compute the state of `window` (all bases valid) from scratch.
    fn init(&self, window: &[u8], state: &mut Self::State);

    /// Move `state` one base in `dir`.
    ///
    /// `sym(j)` for `j` in `0..=k` is the base at offset `j` from the lower
    /// of the two window starts, so `sym(0)` leaves (forward) or enters
    /// (backward) and `sym(k)` enters (forward) or leaves (backward).
    fn shift<F: Fn(usize) -> u8>(&self, dir: Direction, sym: F, state: &mut Self::State);

    /// Write the derived hashes of `state` into `out`.
    fn hashes(&self, state: &Self::State, out: &mut [u64]);
}

/// Shift `state` (the window starting at `pos`) one base in `dir`.
///
/// Free function so a roll can update the roller's own state while the
/// closure borrows its source.
#[inline(always)]
fn shift_state<S: WindowSource, E: HashEngine>(
    src: &S,
    engine: &E,
    k: u16,
    pos: usize,
    dir: Direction,
    incoming: u8,
    state: &mut E::State,
) {
    let k = k as usize;
    match dir {
        Direction::Forward => engine.shift(
            dir,
            |j| if j == k { incoming } else { src.symbol(pos + j) },
            state,
        ),
        Direction::Backward => {
            let lower = pos.wrapping_sub(1);
            engine.shift(
                dir,
                |j| if j == 0 { incoming } else { src.symbol(lower.wrapping_add(j)) },
                state,
            )
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Roller<S, E: HashEngine> {
    src: S,
    engine: E,
    k: u16,
    pos: usize,
    initialized: bool,
    state: E::State,
    hashes: Box<[u64]>,
}

impl<S: WindowSource, E: HashEngine> Roller<S, E> {
    pub(crate) fn new(src: S, engine: E, k: u16, num_hashes: usize, pos: usize) -> Self {
        let state = engine.empty_state();
        Self {
            src,
            engine,
            k,
            pos,
            initialized: false,
            state,
            hashes: vec![0; num_hashes].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub(crate) fn k(&self) -> u16 {
        self.k
    }

    #[inline(always)]
    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline(always)]
    pub(crate) fn hashes(&self) -> &[u64] {
        &self.hashes
    }

    #[inline(always)]
    pub(crate) fn state(&self) -> &E::State {
        &self.state
    }

    #[inline(always)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    #[inline(always)]
    pub(crate) fn source(&self) -> &S {
        &self.src
    }

    /// Current window, if there is one.
    pub(crate) fn current_window(&self) -> Option<std::borrow::Cow<'_, [u8]>> {
        self.initialized
            .then(|| self.src.window(self.pos, self.k as usize))
    }

    /// Write the hashes of an arbitrary state without committing it.
    pub(crate) fn show(&mut self, state: &E::State) {
        self.engine.hashes(state, &mut self.hashes);
    }

    /// Replace the current state (the source must already hold the matching
    /// window) and refresh the hash buffer.
    pub(crate) fn commit(&mut self, state: E::State) {
        self.state = state;
        self.engine.hashes(&self.state, &mut self.hashes);
    }

    pub(crate) fn source_mut(&mut self) -> &mut S {
        &mut self.src
    }

    /// Swap in a new source and start position; the next move re‑initialises.
    pub(crate) fn reset(&mut self, src: S, pos: usize) {
        self.src = src;
        self.reset_pos(pos);
    }

    /// Forget the current window but keep the source.
    pub(crate) fn reset_pos(&mut self, pos: usize) {
        self.pos = pos;
        self.initialized = false;
        self.state = self.engine.empty_state();
    }

    fn exhaust(&mut self) -> bool {
        self.pos = NO_POS;
        self.initialized = false;
        false
    }

    fn load(&mut self) {
        let window = self.src.window(self.pos, self.k as usize);
        self.engine.init(&window, &mut self.state);
        self.engine.hashes(&self.state, &mut self.hashes);
        self.initialized = true;
    }

    /// Find the first valid window at or after `pos`.
    pub(crate) fn init(&mut self) -> bool {
        let k = self.k as usize;
        let len = self.src.len();
        if k > len {
            return self.exhaust();
        }
        while self.pos <= len - k {
            let invalid = last_invalid(&self.src.window(self.pos, k));
            match invalid {
                None => {
                    self.load();
                    return true;
                }
                Some(i) if self.src.reads_ahead() => self.pos += i + 1,
                Some(_) => break,
            }
        }
        self.exhaust()
    }

    /// Find the last valid window at or before `pos`.
    pub(crate) fn init_back(&mut self) -> bool {
        let k = self.k as usize;
        let len = self.src.len();
        if k > len || self.pos == NO_POS {
            return self.exhaust();
        }
        self.pos = self.pos.min(len - k);
        loop {
            let invalid = first_invalid(&self.src.window(self.pos, k));
            match invalid {
                None => {
                    self.load();
                    return true;
                }
                Some(i) if self.src.reads_ahead() && self.pos + i >= k => {
                    self.pos = self.pos + i - k;
                }
                Some(_) => return self.exhaust(),
            }
        }
    }

    /// Base that would enter on a forward move, read from the source.
    #[inline(always)]
    fn next_symbol(&self) -> Option<u8> {
        let k = self.k as usize;
        (self.pos < self.src.len() - k).then(|| self.src.symbol(self.pos + k))
    }

    /// Base that would enter on a backward move, read from the source.
    #[inline(always)]
    fn prev_symbol(&self) -> Option<u8> {
        (self.pos > 0).then(|| self.src.symbol(self.pos - 1))
    }

    /// Shift `state`, which describes the window at `self.pos`, one base in
    /// `dir` with `incoming` entering.
    #[inline(always)]
    fn shift_into(&self, dir: Direction, incoming: u8, state: &mut E::State) {
        shift_state(&self.src, &self.engine, self.k, self.pos, dir, incoming, state);
    }

    /// Move forward, reading the incoming base from the source.
    pub(crate) fn roll(&mut self) -> bool {
        if !self.initialized {
            return self.init();
        }
        match self.next_symbol() {
            Some(c) => self.step_forward(c),
            None => false,
        }
    }

    /// Move forward with a caller‑supplied incoming base.
    pub(crate) fn roll_char(&mut self, incoming: u8) -> bool {
        if !self.initialized {
            return self.init();
        }
        self.step_forward(incoming)
    }

    fn step_forward(&mut self, incoming: u8) -> bool {
        let k = self.k as usize;
        if is_invalid(incoming) {
            if !self.src.reads_ahead() {
                return false;
            }
            tracing::trace!(pos = self.pos, k, "invalid base ahead, jumping");
            self.pos += k;
            self.initialized = false;
            return self.init();
        }
        shift_state(
            &self.src,
            &self.engine,
            self.k,
            self.pos,
            Direction::Forward,
            incoming,
            &mut self.state,
        );
        self.engine.hashes(&self.state, &mut self.hashes);
        self.src.store(self.pos + k, incoming);
        self.pos += 1;
        true
    }

    /// Move backward, reading the incoming base from the source.
    pub(crate) fn roll_back(&mut self) -> bool {
        if !self.initialized {
            return self.init_back();
        }
        match self.prev_symbol() {
            Some(c) => self.step_backward(c),
            None => false,
        }
    }

    /// Move backward with a caller‑supplied incoming base.
    pub(crate) fn roll_back_char(&mut self, incoming: u8) -> bool {
        if !self.initialized {
            return self.init_back();
        }
        self.step_backward(incoming)
    }

    fn step_backward(&mut self, incoming: u8) -> bool {
        if self.pos == 0 {
            return false;
        }
        let k = self.k as usize;
        if is_invalid(incoming) {
            if !self.src.reads_ahead() {
                return false;
            }
            tracing::trace!(pos = self.pos, k, "invalid base behind, jumping");
            if self.pos < k {
                return self.exhaust();
            }
            self.pos -= k;
            self.initialized = false;
            return self.init_back();
        }
        shift_state(
            &self.src,
            &self.engine,
            self.k,
            self.pos,
            Direction::Backward,
            incoming,
            &mut self.state,
        );
        self.engine.hashes(&self.state, &mut self.hashes);
        self.src.store(self.pos - 1, incoming);
        self.pos -= 1;
        true
    }

    /// Run the initial search without keeping its outcome, leaving the
    /// would‑be hashes in the buffer.
    fn probe(&mut self, dir: Direction) -> bool {
        let (pos, state) = (self.pos, self.state.clone());
        let found = match dir {
            Direction::Forward => self.init(),
            Direction::Backward => self.init_back(),
        };
        self.pos = pos;
        self.state = state;
        self.initialized = false;
        found
    }

    fn peek_with(&mut self, dir: Direction, incoming: u8) -> bool {
        if is_invalid(incoming) {
            return false;
        }
        let mut state = self.state.clone();
        self.shift_into(dir, incoming, &mut state);
        self.engine.hashes(&state, &mut self.hashes);
        true
    }

    pub(crate) fn peek(&mut self) -> bool {
        if !self.initialized {
            return self.probe(Direction::Forward);
        }
        match self.next_symbol() {
            Some(c) => self.peek_with(Direction::Forward, c),
            None => false,
        }
    }

    pub(crate) fn peek_char(&mut self, incoming: u8) -> bool {
        if !self.initialized {
            return self.probe(Direction::Forward);
        }
        self.peek_with(Direction::Forward, incoming)
    }

    pub(crate) fn peek_back(&mut self) -> bool {
        if !self.initialized {
            return self.probe(Direction::Backward);
        }
        match self.prev_symbol() {
            Some(c) => self.peek_with(Direction::Backward, c),
            None => false,
        }
    }

    pub(crate) fn peek_back_char(&mut self, incoming: u8) -> bool {
        if !self.initialized {
            return self.probe(Direction::Backward);
        }
        self.peek_with(Direction::Backward, incoming)
    }
}
