use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::Config;
use crate::error::SessionError;
use crate::geometry::Point;
use crate::grid::{CellPos, Grid};
use crate::piece::{Piece, PieceId, PieceKind};
use crate::placement::{self, Placement, Verdict};

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceKind;
}

pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())]
    }
}

pub struct SequencePieceProvider {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        Self { kinds, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        if self.kinds.is_empty() {
            return PieceKind::Monomino;
        }
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SessionEvent {
    PiecePickedUp(usize),
    PreviewChanged { slot: usize, fits: bool },
    PiecePlaced { slot: usize, cells: usize },
    PieceReturned(usize),
    HoldingRefilled,
}

// ============================================================================
// Session
// ============================================================================

/// The input layer: owns the grid and the holding area and turns drag events
/// into evaluate/commit calls.
pub struct Session {
    grid: Grid,
    holding: Vec<Option<Piece>>,
    provider: Box<dyn PieceProvider>,
    pending: Option<Placement>,
    conflicts: Vec<CellPos>,
    next_id: u64,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self::with_provider(config, Box::new(RandomPieceProvider::new(config.seed)))
    }

    pub fn with_provider(config: &Config, provider: Box<dyn PieceProvider>) -> Self {
        Self::with_grid(
            Grid::new(config.grid_width, config.grid_height),
            config.holding_slots,
            provider,
        )
    }

    pub fn with_grid(grid: Grid, slots: usize, provider: Box<dyn PieceProvider>) -> Self {
        let mut session = Self {
            grid,
            holding: vec![None; slots],
            provider,
            pending: None,
            conflicts: Vec::new(),
            next_id: 0,
            events: Vec::new(),
        };
        session.refill();
        session.events.clear();
        session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// For the layout pass. Occupancy should only change through drags.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn holding(&self) -> &[Option<Piece>] {
        &self.holding
    }

    pub fn piece(&self, slot: usize) -> Option<&Piece> {
        self.holding.get(slot).and_then(Option::as_ref)
    }

    /// Occupied cells the dragged piece currently collides with.
    pub fn conflicts(&self) -> &[CellPos] {
        &self.conflicts
    }

    pub fn dragged_slot(&self) -> Option<usize> {
        self.holding
            .iter()
            .position(|p| p.as_ref().is_some_and(|p| p.is_being_dragged))
    }

    fn slot_mut(&mut self, slot: usize) -> Result<&mut Piece, SessionError> {
        let slots = self.holding.len();
        self.holding
            .get_mut(slot)
            .ok_or(SessionError::SlotOutOfRange { slot, slots })?
            .as_mut()
            .ok_or(SessionError::EmptySlot(slot))
    }

    pub fn pick_up(&mut self, slot: usize) -> Result<(), SessionError> {
        self.slot_mut(slot)?;
        if let Some(dragged) = self.dragged_slot() {
            return Err(SessionError::AlreadyDragging(dragged));
        }
        self.slot_mut(slot)?.begin_drag();
        self.pending = None;
        self.conflicts.clear();
        debug!("picked up slot {}", slot);
        self.events.push(SessionEvent::PiecePickedUp(slot));
        Ok(())
    }

    /// Drag update: moves the piece and re-evaluates it. Returns the verdict.
    pub fn drag_changed(&mut self, slot: usize, position: Point) -> Result<bool, SessionError> {
        // Borrow the slot and the grid separately; slot_mut would borrow all of self.
        let slots = self.holding.len();
        let piece = self
            .holding
            .get_mut(slot)
            .ok_or(SessionError::SlotOutOfRange { slot, slots })?
            .as_mut()
            .ok_or(SessionError::EmptySlot(slot))?;
        if !piece.is_being_dragged {
            return Err(SessionError::NotDragging(slot));
        }
        piece.move_to(position);
        let verdict = placement::evaluate(piece, &mut self.grid)?;
        let fits = verdict.fits();
        self.conflicts = match &verdict {
            Verdict::Blocked { conflicts, .. } => conflicts.clone(),
            _ => Vec::new(),
        };
        self.pending = verdict.into_placement();
        self.events.push(SessionEvent::PreviewChanged { slot, fits });
        Ok(fits)
    }

    /// Drag end: commits the pending placement if the last update fitted.
    /// Returns whether the piece was placed.
    pub fn drag_ended(&mut self, slot: usize) -> Result<bool, SessionError> {
        if !self.slot_mut(slot)?.is_being_dragged {
            return Err(SessionError::NotDragging(slot));
        }
        let id = self.slot_mut(slot)?.id;

        let placed = match self.pending.take() {
            Some(placement) if placement.piece() == id => {
                match placement::commit(placement, &mut self.grid) {
                    Ok(cells) => {
                        self.holding[slot] = None;
                        self.events.push(SessionEvent::PiecePlaced { slot, cells });
                        true
                    }
                    Err(err) => {
                        self.slot_mut(slot)?.end_drag();
                        self.grid.reset_highlights();
                        self.conflicts.clear();
                        return Err(err.into());
                    }
                }
            }
            _ => {
                self.slot_mut(slot)?.end_drag();
                self.events.push(SessionEvent::PieceReturned(slot));
                false
            }
        };
        self.grid.reset_highlights();
        self.conflicts.clear();

        if self.holding.iter().all(Option::is_none) {
            self.refill();
        }
        Ok(placed)
    }

    fn refill(&mut self) {
        for slot in 0..self.holding.len() {
            let kind = self.provider.next_piece();
            self.holding[slot] = Some(Piece::from_kind(PieceId(self.next_id), kind));
            self.next_id += 1;
        }
        info!("holding area refilled with {} pieces", self.holding.len());
        self.events.push(SessionEvent::HoldingRefilled);
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
