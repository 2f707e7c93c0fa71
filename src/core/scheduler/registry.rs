//! Task registry
//!
//! Fixed-capacity arena of task slots. Registration hands out a
//! generation-checked [`TaskHandle`]; live slots are chained in insertion
//! order through index links so that insertion, removal and "next task of
//! the current sweep" are all O(1) without heap allocation.
//!
//! The registry keeps a sweep cursor. Removing the task under the cursor
//! advances the cursor, so a callback may unregister itself or any other
//! task while a sweep is running. A sweep ends at the task that was last
//! when it began; tasks inserted during a sweep wait for the next one.

use super::stats::TaskStats;
use super::types::{Runnable, SchedulerError, TaskHandle, TaskInfo};

/// One live registration
#[derive(Clone, Copy)]
pub(super) struct TaskEntry<'a> {
    pub name: &'a str,
    pub callback: &'a dyn Runnable,
    pub period_us: u64,
    pub start_time_us: u64,
    pub next_due_us: u64,
    pub stats: TaskStats,
}

impl<'a> TaskEntry<'a> {
    /// Fresh registration; due immediately at `now_us`
    pub fn new(name: &'a str, callback: &'a dyn Runnable, period_us: u64, now_us: u64) -> Self {
        Self {
            name,
            callback,
            period_us,
            start_time_us: now_us,
            next_due_us: now_us,
            stats: TaskStats::default(),
        }
    }

    pub fn info(&self) -> TaskInfo<'a> {
        TaskInfo {
            name: self.name,
            period_us: self.period_us,
            start_time_us: self.start_time_us,
            next_due_us: self.next_due_us,
            stats: self.stats,
        }
    }
}

#[derive(Clone, Copy)]
struct Slot<'a> {
    generation: u16,
    task: Option<TaskEntry<'a>>,
    // Insertion-order links while occupied; `next` doubles as the
    // free-list link while vacant.
    prev: Option<u16>,
    next: Option<u16>,
}

impl<'a> Slot<'a> {
    const EMPTY: Slot<'a> = Slot {
        generation: 0,
        task: None,
        prev: None,
        next: None,
    };
}

/// Arena of task slots with an insertion-ordered live list
pub(super) struct TaskRegistry<'a, const N: usize> {
    slots: [Slot<'a>; N],
    /// Slots handed out at least once; `slots[used..]` were never touched
    used: usize,
    free: Option<u16>,
    head: Option<u16>,
    tail: Option<u16>,
    len: usize,
    /// Next task of the current sweep
    cursor: Option<u16>,
    /// Last task of the current sweep (the tail when it began)
    sweep_last: Option<u16>,
}

impl<'a, const N: usize> TaskRegistry<'a, N> {
    const CAPACITY_FITS_HANDLE: () = assert!(
        N <= u16::MAX as usize,
        "registry capacity must fit a u16 slot index"
    );

    pub const fn new() -> Self {
        let () = Self::CAPACITY_FITS_HANDLE;

        Self {
            slots: [Slot::EMPTY; N],
            used: 0,
            free: None,
            head: None,
            tail: None,
            len: 0,
            cursor: None,
            sweep_last: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Append a task at the end of the live list
    pub fn insert(&mut self, task: TaskEntry<'a>) -> Result<TaskHandle, SchedulerError> {
        let index = match self.free {
            Some(index) => {
                self.free = self.slots[index as usize].next;
                index
            }
            None if self.used < N => {
                self.used += 1;
                (self.used - 1) as u16
            }
            None => return Err(SchedulerError::RegistryFull),
        };

        let slot = &mut self.slots[index as usize];
        slot.task = Some(task);
        slot.prev = self.tail;
        slot.next = None;

        match self.tail {
            Some(tail) => self.slots[tail as usize].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        Ok(self.handle_at(index))
    }

    /// Unlink a task and retire its handle
    pub fn remove(&mut self, handle: TaskHandle) -> Result<TaskEntry<'a>, SchedulerError> {
        if self.get(handle).is_none() {
            return Err(SchedulerError::NotRegistered);
        }

        let index = handle.index;
        let Slot { prev, next, .. } = self.slots[index as usize];

        match prev {
            Some(prev) => self.slots[prev as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next as usize].prev = prev,
            None => self.tail = prev,
        }
        if self.cursor == Some(index) {
            self.cursor = if self.sweep_last == Some(index) {
                None
            } else {
                next
            };
        }
        if self.sweep_last == Some(index) {
            self.sweep_last = prev;
        }

        let slot = &mut self.slots[index as usize];
        let task = slot.task.take().ok_or(SchedulerError::NotRegistered)?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.prev = None;
        slot.next = self.free;
        self.free = Some(index);
        self.len -= 1;

        Ok(task)
    }

    /// Remove every task; returns how many were removed
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;
        while let Some(head) = self.head {
            let handle = self.handle_at(head);
            if self.remove(handle).is_err() {
                break;
            }
            removed += 1;
        }
        removed
    }

    pub fn get(&self, handle: TaskHandle) -> Option<&TaskEntry<'a>> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.task.as_ref())
    }

    pub fn get_mut(&mut self, handle: TaskHandle) -> Option<&mut TaskEntry<'a>> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.task.as_mut())
    }

    /// Live tasks in insertion order
    pub fn iter(&self) -> Iter<'_, 'a, N> {
        Iter {
            registry: self,
            next: self.head,
        }
    }

    /// Point the sweep cursor at the first task and fix the last one
    pub fn begin_sweep(&mut self) {
        self.cursor = self.head;
        self.sweep_last = self.tail;
    }

    /// Take the task under the sweep cursor and advance past it
    pub fn next_in_sweep(&mut self) -> Option<TaskHandle> {
        let index = self.cursor?;
        self.cursor = if self.sweep_last == Some(index) {
            None
        } else {
            self.slots[index as usize].next
        };
        Some(self.handle_at(index))
    }

    pub fn end_sweep(&mut self) {
        self.cursor = None;
        self.sweep_last = None;
    }

    fn handle_at(&self, index: u16) -> TaskHandle {
        TaskHandle {
            index,
            generation: self.slots[index as usize].generation,
        }
    }
}

/// Iterator over live tasks in insertion order
pub(super) struct Iter<'r, 'a, const N: usize> {
    registry: &'r TaskRegistry<'a, N>,
    next: Option<u16>,
}

impl<'r, 'a, const N: usize> Iterator for Iter<'r, 'a, N> {
    type Item = (TaskHandle, &'r TaskEntry<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let slot = &self.registry.slots[index as usize];
        self.next = slot.next;
        let task = slot.task.as_ref()?;
        Some((self.registry.handle_at(index), task))
    }
}
