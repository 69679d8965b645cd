use crate::engine::{EngineCore, TimelineCache};
use crate::ipc::{Command, Event};
use encore_ports::catalog::CatalogPort;
use encore_ports::config::EngineSettings;
use encore_ports::types::{SessionId, Shared};
use rtrb::{Consumer, Producer, RingBuffer};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct DispatchConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 1024,
        }
    }
}

/// Fixed-worker dispatch: commands are routed by session id over SPSC rings,
/// so each session's state is only ever touched by one worker thread.
pub struct WorkerPool {
    command_queues: Vec<Producer<Command>>,
    event_queues: Vec<Consumer<Event>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn spawn<F>(config: DispatchConfig, settings: EngineSettings, make_catalog: F) -> Self
    where
        F: Fn() -> Box<dyn CatalogPort>,
    {
        let workers = config.workers.max(1);
        let timelines = Shared::new(TimelineCache::new());

        let mut command_queues = Vec::with_capacity(workers);
        let mut event_queues = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for _ in 0..workers {
            let (command_tx, command_rx) = RingBuffer::new(config.queue_capacity);
            let (event_tx, event_rx) = RingBuffer::new(config.queue_capacity);
            let core = EngineCore::with_timeline_cache(
                settings.clone(),
                make_catalog(),
                timelines.clone(),
            );

            handles.push(thread::spawn(move || worker_loop(core, command_rx, event_tx)));
            command_queues.push(command_tx);
            event_queues.push(event_rx);
        }

        Self {
            command_queues,
            event_queues,
            handles,
        }
    }

    /// Routes a command to its session's worker. Returns false when that
    /// worker's queue is full; the caller decides whether to retry or drop.
    pub fn dispatch(&mut self, cmd: Command) -> bool {
        let slot = self.route(cmd.session_id());
        self.command_queues[slot].push(cmd).is_ok()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for queue in &mut self.event_queues {
            while let Ok(event) = queue.pop() {
                events.push(event);
            }
        }
        events
    }

    /// Closes the command queues, waits for the workers to drain, and
    /// returns any events still in flight.
    pub fn shutdown(mut self) -> Vec<Event> {
        self.command_queues.clear();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        self.drain_events()
    }

    pub fn workers(&self) -> usize {
        self.command_queues.len().max(self.event_queues.len())
    }

    fn route(&self, session_id: SessionId) -> usize {
        (session_id.0 % self.command_queues.len() as u64) as usize
    }
}

fn worker_loop(mut core: EngineCore, mut commands: Consumer<Command>, mut events: Producer<Event>) {
    loop {
        match commands.pop() {
            Ok(cmd) => {
                let session_id = cmd.session_id();
                if let Err(err) = core.handle_command(cmd) {
                    let _ = events.push(Event::CommandFailed {
                        session_id,
                        message: err.to_string(),
                    });
                }
                for event in core.drain_events() {
                    let _ = events.push(event);
                }
            }
            Err(_) => {
                if commands.is_abandoned() {
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }
        }
    }
}
