//! Parallel scanline scheduling.
//!
//! A fixed pool of scoped worker threads pulls scanlines from a shared queue.
//! Each queued scanline carries the mutable slice of framebuffer cells for its
//! row, so a worker that pops a row owns those pixels outright. The queue lock
//! is held only for the pop, never while shading.

use crate::{Color, Framebuffer, RenderContext};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// How often the coordinating thread checks on the workers.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Minimum time between progress log lines.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Lifecycle of one worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Rendering a scanline it popped from the queue
    Running = 0,
    /// Found the queue empty and is reporting completion
    Draining = 1,
    /// Counted as finished; the thread is exiting
    Done = 2,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Running,
            1 => WorkerState::Draining,
            _ => WorkerState::Done,
        }
    }
}

/// A row index paired with exclusive access to that row's pixels.
struct Scanline<'fb> {
    row: u32,
    cells: &'fb mut [Color],
}

/// Summary of a finished render.
#[derive(Debug, Clone)]
pub struct RenderStats {
    /// Scanlines rendered by each worker, indexed by worker
    pub rows_per_worker: Vec<usize>,
    /// Last state each worker reported
    pub final_states: Vec<WorkerState>,
    /// Wall-clock time from starting the pool to joining it
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn total_rows(&self) -> usize {
        self.rows_per_worker.iter().sum()
    }

    /// Number of workers that rendered at least one scanline.
    pub fn active_workers(&self) -> usize {
        self.rows_per_worker.iter().filter(|&&rows| rows > 0).count()
    }
}

/// Work queue and completion tracking for a single render.
///
/// Built once per render and consumed by [`Scheduler::run`].
pub struct Scheduler<'fb> {
    queue: Mutex<VecDeque<Scanline<'fb>>>,
    completed: AtomicUsize,
    states: Vec<AtomicU8>,
    total_rows: usize,
}

impl<'fb> Scheduler<'fb> {
    /// Queue every row of `framebuffer` for `workers` threads (at least one).
    pub fn new(framebuffer: &'fb mut Framebuffer, workers: usize) -> Self {
        let workers = workers.max(1);
        let queue: VecDeque<Scanline<'fb>> = framebuffer
            .rows_mut()
            .enumerate()
            .map(|(row, cells)| Scanline {
                row: row as u32,
                cells,
            })
            .collect();
        let total_rows = queue.len();

        Self {
            queue: Mutex::new(queue),
            completed: AtomicUsize::new(0),
            states: (0..workers)
                .map(|_| AtomicU8::new(WorkerState::Running as u8))
                .collect(),
            total_rows,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.states.len()
    }

    /// Scanlines not yet picked up by a worker.
    pub fn remaining(&self) -> usize {
        self.lock_queue().len()
    }

    /// Render every queued scanline and wait for all workers to finish.
    pub fn run(self, context: &RenderContext) -> RenderStats {
        let start = Instant::now();
        let workers = self.worker_count();
        log::info!(
            "Rendering {} scanlines @ {} spp on {} threads",
            self.total_rows,
            context.config.samples_per_pixel,
            workers
        );

        let rows_per_worker = thread::scope(|scope| {
            let this = &self;
            let handles: Vec<_> = (0..workers)
                .map(|index| scope.spawn(move || this.work(index, context)))
                .collect();

            let mut last_report = Instant::now();
            let mut last_remaining = usize::MAX;
            while this.completed.load(Ordering::Acquire) < workers {
                // A panicked worker never reports Done; stop waiting once every thread exited
                if handles.iter().all(|handle| handle.is_finished()) {
                    break;
                }

                let remaining = this.remaining();
                if remaining != last_remaining && last_report.elapsed() >= PROGRESS_INTERVAL {
                    log::info!("Scanlines remaining: {}", remaining);
                    last_remaining = remaining;
                    last_report = Instant::now();
                }
                thread::sleep(POLL_INTERVAL);
            }

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect::<Vec<usize>>()
        });

        let elapsed = start.elapsed();
        log::info!("All {} workers done in {:?}", workers, elapsed);

        RenderStats {
            rows_per_worker,
            final_states: self
                .states
                .iter()
                .map(|state| WorkerState::from_u8(state.load(Ordering::Acquire)))
                .collect(),
            elapsed,
        }
    }

    /// Worker loop. Returns the number of scanlines this worker rendered.
    fn work(&self, index: usize, context: &RenderContext) -> usize {
        let mut rendered = 0;

        loop {
            // The guard is dropped at the end of this statement
            let next = self.lock_queue().pop_front();

            match next {
                Some(line) => {
                    self.set_state(index, WorkerState::Running);
                    context.render_row(line.row, line.cells);
                    rendered += 1;
                }
                None => {
                    self.set_state(index, WorkerState::Draining);
                    self.completed.fetch_add(1, Ordering::Release);
                    self.set_state(index, WorkerState::Done);
                    log::debug!("Worker {} done after {} scanlines", index, rendered);
                    return rendered;
                }
            }
        }
    }

    fn set_state(&self, index: usize, state: WorkerState) {
        self.states[index].store(state as u8, Ordering::Release);
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Scanline<'fb>>> {
        // A poisoned queue still holds valid rows; the panic itself is re-raised on join
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Hardware thread count, or 1 if it cannot be determined.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Render `framebuffer` with a pool of `workers` threads.
pub fn render_parallel(
    context: &RenderContext,
    framebuffer: &mut Framebuffer,
    workers: usize,
) -> RenderStats {
    Scheduler::new(framebuffer, workers).run(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render_serial, Camera, Material, RenderConfig, Scene, Sphere};
    use ember_math::Vec3;

    const SENTINEL: f64 = -1.0;

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        let ground = scene.add_material(Material::lambertian(Color::splat(0.5)));
        let glass = scene.add_material(Material::dielectric(1.5));
        let metal = scene.add_material(Material::metal(Color::new(0.8, 0.6, 0.2), 0.3));
        scene.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground));
        scene.add(Sphere::new(Vec3::new(-0.6, 0.0, -1.0), 0.5, glass));
        scene.add(Sphere::new(Vec3::new(0.6, 0.0, -1.0), 0.5, metal));
        scene
    }

    fn test_camera(aspect_ratio: f64) -> Camera {
        let mut camera = Camera::new().with_aspect_ratio(aspect_ratio);
        camera.initialize();
        camera
    }

    #[test]
    fn test_more_workers_than_scanlines() {
        let scene = test_scene();
        let camera = test_camera(2.0);
        let config = RenderConfig {
            samples_per_pixel: 2,
            max_depth: 4,
            seed: 5,
        };
        let context = RenderContext::new(&camera, &scene, &config, 6, 3);

        let mut framebuffer = Framebuffer::filled(6, 3, Color::splat(SENTINEL));
        let stats = render_parallel(&context, &mut framebuffer, 8);

        assert_eq!(stats.rows_per_worker.len(), 8);
        assert_eq!(stats.total_rows(), 3);
        assert!(stats.active_workers() >= 1 && stats.active_workers() <= 3);
        assert!(stats.rows_per_worker.iter().filter(|&&rows| rows == 0).count() >= 5);
        assert!(stats.final_states.iter().all(|state| *state == WorkerState::Done));

        for color in framebuffer.pixels() {
            assert!(color.min_element() >= 0.0, "sentinel survived: {:?}", color);
        }
    }

    #[test]
    fn test_every_row_written_once() {
        let scene = Scene::new();
        let camera = test_camera(1.0);
        let config = RenderConfig {
            samples_per_pixel: 1,
            max_depth: 2,
            seed: 1,
        };
        let context = RenderContext::new(&camera, &scene, &config, 5, 17);

        let mut framebuffer = Framebuffer::filled(5, 17, Color::splat(SENTINEL));
        let stats = render_parallel(&context, &mut framebuffer, 4);

        assert_eq!(stats.total_rows(), 17);
        assert!(framebuffer
            .pixels()
            .iter()
            .all(|color| *color != Color::splat(SENTINEL)));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let scene = test_scene();
        let camera = test_camera(1.5);
        let config = RenderConfig {
            samples_per_pixel: 3,
            max_depth: 6,
            seed: 1234,
        };
        let context = RenderContext::new(&camera, &scene, &config, 12, 8);

        let mut serial = Framebuffer::new(12, 8);
        render_serial(&context, &mut serial);

        for workers in [1, 3, 16] {
            let mut parallel = Framebuffer::new(12, 8);
            render_parallel(&context, &mut parallel, workers);
            assert_eq!(serial, parallel, "{} workers diverged", workers);
        }
    }

    #[test]
    fn test_zero_workers_still_renders() {
        let scene = Scene::new();
        let camera = test_camera(1.0);
        let config = RenderConfig::default();
        let context = RenderContext::new(&camera, &scene, &config, 2, 2);

        let mut framebuffer = Framebuffer::filled(2, 2, Color::splat(SENTINEL));
        let scheduler = Scheduler::new(&mut framebuffer, 0);
        assert_eq!(scheduler.worker_count(), 1);
        assert_eq!(scheduler.remaining(), 2);

        let stats = scheduler.run(&context);
        assert_eq!(stats.rows_per_worker, vec![2]);
    }

    #[test]
    fn test_default_worker_count_positive() {
        assert!(default_worker_count() >= 1);
    }
}
