//! Test doubles for the Tracker collaborators.

use crate::error::Result;
use crate::events::{Point, Size};
use crate::glide_error;
use crate::services::input_source::TapControl;
use crate::services::text_accessor::TextAccessor;
use crate::services::window_accessor::{WindowAccessor, WindowHandle};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct WindowLog {
    geometry: Option<(Point, Size)>,
    lookups: usize,
    origins: Vec<Point>,
    sizes: Vec<Size>,
    fail_writes: bool,
}

/// Оконная система с одним окном, записывает все удачные записи геометрии
#[derive(Default)]
pub struct MockWindows {
    log: Arc<Mutex<WindowLog>>,
}

impl MockWindows {
    pub fn with_window(origin: Point, size: Size) -> Self {
        let windows = Self::default();
        windows.set_geometry(origin, size);
        windows
    }

    pub fn set_geometry(&self, origin: Point, size: Size) {
        self.log.lock().geometry = Some((origin, size));
    }

    pub fn remove_window(&self) {
        self.log.lock().geometry = None;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.log.lock().fail_writes = fail;
    }

    pub fn lookups(&self) -> usize {
        self.log.lock().lookups
    }

    pub fn origins(&self) -> Vec<Point> {
        self.log.lock().origins.clone()
    }

    pub fn sizes(&self) -> Vec<Size> {
        self.log.lock().sizes.clone()
    }
}

impl WindowAccessor for MockWindows {
    fn window_at(&self, _point: Point) -> Option<Box<dyn WindowHandle>> {
        let mut log = self.log.lock();
        log.lookups += 1;
        log.geometry?;
        Some(Box::new(MockWindow { log: self.log.clone() }))
    }
}

struct MockWindow {
    log: Arc<Mutex<WindowLog>>,
}

impl WindowHandle for MockWindow {
    fn origin(&self) -> Option<Point> {
        self.log.lock().geometry.map(|(origin, _)| origin)
    }

    fn size(&self) -> Option<Size> {
        self.log.lock().geometry.map(|(_, size)| size)
    }

    fn set_origin(&self, origin: Point) -> Result<()> {
        let mut log = self.log.lock();
        if log.fail_writes {
            return Err(glide_error!(command, "windowmove failed"));
        }
        log.origins.push(origin);
        Ok(())
    }

    fn set_size(&self, size: Size) -> Result<()> {
        let mut log = self.log.lock();
        if log.fail_writes {
            return Err(glide_error!(command, "windowsize failed"));
        }
        log.sizes.push(size);
        Ok(())
    }
}

/// Выделенный текст в памяти
pub struct MockText {
    selection: Mutex<Option<String>>,
    written: Mutex<Vec<String>>,
    reads: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MockText {
    pub fn new(selection: Option<&str>) -> Self {
        Self {
            selection: Mutex::new(selection.map(str::to_string)),
            written: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_selection(&self, selection: Option<&str>) {
        *self.selection.lock() = selection.map(str::to_string);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TextAccessor for MockText {
    fn selected_text(&self) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.selection.lock().clone()
    }

    fn set_selected_text(&self, text: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(glide_error!(command, "xdotool type failed"));
        }
        self.written.lock().push(text.to_string());
        Ok(())
    }
}

/// Считает запросы на повторное включение перехвата
#[derive(Default)]
pub struct MockTap {
    reenabled: AtomicUsize,
}

impl MockTap {
    pub fn reenabled(&self) -> usize {
        self.reenabled.load(Ordering::SeqCst)
    }
}

impl TapControl for MockTap {
    fn reenable(&self) {
        self.reenabled.fetch_add(1, Ordering::SeqCst);
    }
}
