use crate::error::NetError;

/// One entry in the list arena.
#[derive(Debug)]
struct Entry<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A cursor-based doubly linked sequence.
///
/// Entries live in an index-addressed arena rather than behind owned
/// pointers, with explicit `prev`/`next` indices; freed slots are recycled
/// through a free list. The public surface is purely positional: a cursor
/// identifies one entry, and mutation happens relative to it.
///
/// Invariants: `head.prev` and `tail.next` are always `None`, and the
/// cursor, when present, always identifies an entry reachable from head.
/// `add_to_head` and `remove_from_head` reposition the cursor to the new
/// head; `remove` by value falls back to head when the cursor was on the
/// removed entry.
#[derive(Debug, Default)]
pub struct BidirectionalList<T> {
    slots: Vec<Option<Entry<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    cursor: Option<usize>,
    len: usize,
}

impl<T> BidirectionalList<T> {
    pub fn new() -> BidirectionalList<T> {
        BidirectionalList {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            cursor: None,
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts a new entry at the head and moves the cursor onto it.
    pub fn add_to_head(&mut self, value: T) {
        let index = self.alloc(value, None, self.head);
        if let Some(old_head) = self.head {
            self.entry_mut(old_head).prev = Some(index);
        } else {
            self.tail = Some(index);
        }
        self.head = Some(index);
        self.cursor = self.head;
        self.len += 1;
    }

    /// Inserts a new entry immediately after the cursor.
    pub fn add_after_current(&mut self, value: T) -> Result<(), NetError> {
        let current = self.cursor.ok_or(NetError::EmptyStructure(
            "cannot add after current without a cursor",
        ))?;
        let old_next = self.entry(current).next;
        let index = self.alloc(value, Some(current), old_next);
        match old_next {
            Some(next) => self.entry_mut(next).prev = Some(index),
            None => self.tail = Some(index),
        }
        self.entry_mut(current).next = Some(index);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the head entry; the cursor moves to the new head.
    pub fn remove_from_head(&mut self) -> Result<T, NetError> {
        let old_head = self.head.ok_or(NetError::EmptyStructure(
            "cannot remove from the head of an empty list",
        ))?;
        self.head = self.entry(old_head).next;
        match self.head {
            Some(new_head) => self.entry_mut(new_head).prev = None,
            None => self.tail = None,
        }
        self.cursor = self.head;
        Ok(self.release(old_head))
    }

    /// Removes and returns the entry after the cursor.
    pub fn remove_after_current(&mut self) -> Result<T, NetError> {
        let current = self.cursor.ok_or(NetError::EmptyStructure(
            "cannot remove after current without a cursor",
        ))?;
        let target = self.entry(current).next.ok_or(NetError::EmptyStructure(
            "no entry after current to remove",
        ))?;
        self.unlink(target);
        Ok(self.release(target))
    }

    pub fn reset_to_head(&mut self) {
        self.cursor = self.head;
    }

    pub fn reset_to_tail(&mut self) {
        self.cursor = self.tail;
    }

    /// Advances the cursor one entry toward the tail.
    pub fn move_forward(&mut self) -> Result<(), NetError> {
        let current = self.cursor.ok_or(NetError::EmptyStructure(
            "cannot move forward without a cursor",
        ))?;
        self.cursor = Some(self.entry(current).next.ok_or(
            NetError::EmptyStructure("cannot move forward past the tail"),
        )?);
        Ok(())
    }

    /// Retreats the cursor one entry toward the head.
    pub fn move_backward(&mut self) -> Result<(), NetError> {
        let current = self.cursor.ok_or(NetError::EmptyStructure(
            "cannot move backward without a cursor",
        ))?;
        self.cursor = Some(self.entry(current).prev.ok_or(
            NetError::EmptyStructure("cannot move backward past the head"),
        )?);
        Ok(())
    }

    pub fn current_value(&self) -> Result<&T, NetError> {
        let current = self.cursor.ok_or(NetError::EmptyStructure(
            "no current entry",
        ))?;
        Ok(&self.entry(current).value)
    }

    /// The value after the cursor, if both exist.
    pub fn peek_next(&self) -> Option<&T> {
        let next = self.entry(self.cursor?).next?;
        Some(&self.entry(next).value)
    }

    pub fn head_value(&self) -> Option<&T> {
        self.head.map(|index| &self.entry(index).value)
    }

    pub fn tail_value(&self) -> Option<&T> {
        self.tail.map(|index| &self.entry(index).value)
    }

    pub fn cursor_at_tail(&self) -> bool {
        self.cursor.is_some() && self.cursor == self.tail
    }

    /// True when the entry after the cursor exists and is the tail.
    pub fn next_is_tail(&self) -> bool {
        match self.cursor {
            Some(current) => {
                let next = self.entry(current).next;
                next.is_some() && next == self.tail
            }
            None => false,
        }
    }

    /// Iterates the values head to tail without disturbing the cursor.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut at = self.head;
        std::iter::from_fn(move || {
            let index = at?;
            let entry = self.entry(index);
            at = entry.next;
            Some(&entry.value)
        })
    }

    // ── Internal link management ───────────────────────────────────────────

    fn alloc(&mut self, value: T, prev: Option<usize>, next: Option<usize>) -> usize {
        let entry = Entry { value, prev, next };
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(entry);
                index
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    /// Detaches `index` from the chain, fixing head/tail at the boundaries.
    fn unlink(&mut self, index: usize) {
        let prev = self.entry(index).prev;
        let next = self.entry(index).next;
        match prev {
            Some(p) => self.entry_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entry_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn release(&mut self, index: usize) -> T {
        let entry = self.slots[index].take();
        self.free.push(index);
        self.len -= 1;
        match entry {
            Some(entry) => entry.value,
            None => panic!("released a vacant list slot"),
        }
    }

    fn entry(&self, index: usize) -> &Entry<T> {
        match self.slots[index].as_ref() {
            Some(entry) => entry,
            None => panic!("stale list index"),
        }
    }

    fn entry_mut(&mut self, index: usize) -> &mut Entry<T> {
        match self.slots[index].as_mut() {
            Some(entry) => entry,
            None => panic!("stale list index"),
        }
    }
}

impl<T: PartialEq> BidirectionalList<T> {
    /// Linear scan from the head; repositions the cursor on the first match.
    pub fn find(&mut self, value: &T) -> Result<(), NetError> {
        let mut at = self.head;
        while let Some(index) = at {
            if self.entry(index).value == *value {
                self.cursor = Some(index);
                return Ok(());
            }
            at = self.entry(index).next;
        }
        Err(NetError::NotFound)
    }

    /// Removes the first entry holding `value` and returns its payload.
    pub fn remove(&mut self, value: &T) -> Result<T, NetError> {
        let mut at = self.head;
        while let Some(index) = at {
            if self.entry(index).value == *value {
                self.unlink(index);
                if self.cursor == Some(index) {
                    self.cursor = self.head;
                }
                return Ok(self.release(index));
            }
            at = self.entry(index).next;
        }
        Err(NetError::NotFound)
    }
}
