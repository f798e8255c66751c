//! Event pump wiring the session, the generation system, and the snapshot
//! store.
//!
//! The runner owns the composition protocol: boot resumes a same-day
//! snapshot or resets, every install is snapshotted, and completion clears
//! the store. Snapshot write failures are reported but never interrupt
//! gameplay.

use loadout_core::{Command, DifficultyTable, Event, ProgressionState, RandomSource};
use loadout_persistence::{DailySnapshot, SnapshotStore};
use loadout_session::{apply, query, Session};
use loadout_system_generation::Generation;

/// Composition root driving one daily session end to end.
pub(crate) struct Runner {
    session: Session,
    generation: Generation,
    store: SnapshotStore,
    day: String,
}

impl Runner {
    /// Boots a runner for the given day: resumes the stored snapshot when it
    /// matches, otherwise clears it and starts the session fresh.
    ///
    /// Returns the runner together with the boot events for rendering.
    pub(crate) fn boot(
        table: DifficultyTable,
        store: SnapshotStore,
        day: String,
        fresh: bool,
        rng: &mut dyn RandomSource,
    ) -> (Self, Vec<Event>) {
        let mut runner = Self {
            session: Session::new(),
            generation: Generation::new(table),
            store,
            day,
        };

        if fresh {
            runner.store.clear();
        }

        let resumed = runner
            .store
            .load()
            .and_then(|snapshot| snapshot.resume(&runner.day));

        let mut events = Vec::new();
        match resumed {
            Some((puzzle, progress)) => {
                apply(
                    &mut runner.session,
                    Command::RestoreSession { puzzle, progress },
                    &mut events,
                );
            }
            None => {
                // Stale or corrupt snapshots are discarded, not repaired.
                runner.store.clear();
                apply(&mut runner.session, Command::ResetSession, &mut events);
                runner.pump(&mut events, rng);
            }
        }
        (runner, events)
    }

    /// Applies one command and lets the generator answer any advancement,
    /// returning every event raised along the way in order.
    pub(crate) fn dispatch(
        &mut self,
        command: Command,
        rng: &mut dyn RandomSource,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.session, command, &mut events);
        self.pump(&mut events, rng);
        events
    }

    /// Read-only access to the session for rendering.
    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    fn pump(&mut self, events: &mut Vec<Event>, rng: &mut dyn RandomSource) {
        // Each chunk of events is handed to the generator exactly once.
        let mut cursor = 0;
        while cursor < events.len() {
            let mut commands = Vec::new();
            self.generation.handle(&events[cursor..], rng, &mut commands);
            self.settle(&events[cursor..]);
            cursor = events.len();

            let mut follow_ups = Vec::new();
            for command in commands {
                apply(&mut self.session, command, &mut follow_ups);
            }
            self.snapshot_installs(&follow_ups);
            events.extend(follow_ups);
        }
    }

    fn settle(&self, events: &[Event]) {
        if events.iter().any(|event| *event == Event::DailyCompleted) {
            self.store.clear();
        }
    }

    fn snapshot_installs(&self, events: &[Event]) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::PuzzleInstalled { .. }))
        {
            return;
        }
        let Some(puzzle) = query::puzzle(&self.session) else {
            return;
        };
        let progress: ProgressionState = query::progress(&self.session);
        let snapshot = DailySnapshot::capture(puzzle, progress, self.day.clone());
        if let Err(error) = self.store.save(&snapshot) {
            eprintln!("warning: session will not survive a restart: {error}");
        }
    }
}
