//! The editing session driven by the input layer

use editor_core::{
    Cursor, Edit, EditError, EditMode, FileContent, FileIndex, Line, LineSet, Motion, NameSlot,
};
use hal::{FlashDevice, InterruptControl};
use services_storage::{FlashPersistence, StorageError};

use crate::error::{is_printable, SessionError, SessionResult};
use crate::name_entry::NameEntry;

/// The one resident file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    slot: usize,
    content: FileContent,
    cursor: Cursor,
    dirty: bool,
}

impl OpenFile {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// True when the content differs from what was last loaded or saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Editor state threaded through every operation
pub struct EditorSession<F: FlashDevice, I: InterruptControl> {
    storage: FlashPersistence<F, I>,
    index: FileIndex,
    open: Option<OpenFile>,
    mode: EditMode,
}

impl<F: FlashDevice, I: InterruptControl> EditorSession<F, I> {
    /// Load the directory and start with no file open
    pub fn start(mut storage: FlashPersistence<F, I>) -> SessionResult<Self> {
        let index = storage.load_index()?;
        log::info!("session started with {} files", index.file_count());
        Ok(Self {
            storage,
            index,
            open: None,
            mode: EditMode::default(),
        })
    }

    pub fn storage(&self) -> &FlashPersistence<F, I> {
        &self.storage
    }

    pub fn into_storage(self) -> FlashPersistence<F, I> {
        self.storage
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Name slot `id`, for the directory screen
    pub fn slot(&self, id: usize) -> Option<&NameSlot> {
        self.index.slot(id)
    }

    pub fn open(&self) -> Option<&OpenFile> {
        self.open.as_ref()
    }

    /// Line `idx` of the open file
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.open.as_ref().and_then(|file| file.content.line(idx))
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.open.as_ref().map(|file| file.cursor)
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_dirty(&self) -> bool {
        self.open.as_ref().is_some_and(|file| file.dirty)
    }

    pub fn toggle_mode(&mut self) -> EditMode {
        self.mode = self.mode.toggle();
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    fn apply(
        &mut self,
        op: impl FnOnce(&mut FileContent, Cursor) -> Result<Edit, EditError>,
    ) -> SessionResult<LineSet> {
        let file = self.open.as_mut().ok_or(SessionError::NoOpenFile)?;
        let edit = op(&mut file.content, file.cursor)?;
        file.cursor = edit.cursor;
        if !edit.changed.is_empty() {
            file.dirty = true;
        }
        Ok(edit.changed)
    }

    /// Type a character at the cursor in the current mode
    pub fn add_char(&mut self, ch: u8) -> SessionResult<LineSet> {
        if !is_printable(ch) {
            return Err(SessionError::Unprintable(ch));
        }
        let mode = self.mode;
        self.apply(|content, cursor| content.add_char(cursor, ch, mode))
    }

    pub fn delete_char(&mut self) -> SessionResult<LineSet> {
        self.apply(|content, cursor| content.delete_char(cursor))
    }

    pub fn backspace(&mut self) -> SessionResult<LineSet> {
        self.apply(|content, cursor| content.backspace(cursor))
    }

    pub fn split_line(&mut self) -> SessionResult<LineSet> {
        self.apply(|content, cursor| content.split_line(cursor))
    }

    pub fn move_cursor(&mut self, motion: Motion) -> SessionResult<Cursor> {
        let file = self.open.as_mut().ok_or(SessionError::NoOpenFile)?;
        file.cursor = file.content.apply_motion(file.cursor, motion)?;
        Ok(file.cursor)
    }

    /// Name an unused slot
    pub fn create_file(&mut self, slot: usize, name: &[u8]) -> SessionResult<()> {
        self.storage.create_file(&mut self.index, slot, name)?;
        Ok(())
    }

    pub fn rename_file(&mut self, slot: usize, name: &[u8]) -> SessionResult<()> {
        self.storage.rename_file(&mut self.index, slot, name)?;
        Ok(())
    }

    /// Commit a finished name prompt to `slot`
    ///
    /// An unused slot gets a new file, a used one is renamed.
    pub fn commit_name(&mut self, slot: usize, entry: &NameEntry) -> SessionResult<()> {
        let used = self.index.slot(slot).is_some_and(|s| !s.is_empty());
        if used {
            self.rename_file(slot, entry.text())
        } else {
            self.create_file(slot, entry.text())
        }
    }

    /// Start a prompt preloaded with the name in `slot`
    pub fn begin_rename(&self, slot: usize) -> SessionResult<NameEntry> {
        match self.index.slot(slot) {
            Some(existing) if !existing.is_empty() => Ok(NameEntry::for_rename(existing)),
            Some(_) => Err(SessionError::EmptySlot(slot)),
            None => Err(StorageError::SlotOutOfRange(slot).into()),
        }
    }

    /// Free a slot and wipe its content; closes it if it is the open file
    pub fn delete_file(&mut self, slot: usize) -> SessionResult<()> {
        self.storage.delete_file(&mut self.index, slot)?;
        if self.open.as_ref().is_some_and(|file| file.slot == slot) {
            self.open = None;
        }
        Ok(())
    }

    /// Make `slot` the resident file
    ///
    /// Any previously resident copy is discarded, saved or not.
    pub fn open_file(&mut self, slot: usize) -> SessionResult<&OpenFile> {
        match self.index.slot(slot) {
            Some(entry) if entry.is_empty() => return Err(SessionError::EmptySlot(slot)),
            Some(_) => {}
            None => return Err(StorageError::SlotOutOfRange(slot).into()),
        }

        let content = self.storage.load_content(slot)?;
        if self.is_dirty() {
            log::warn!("discarding unsaved changes to open file");
        }
        self.mode = EditMode::ShiftInsert;
        log::debug!("opened slot {}", slot);
        Ok(&*self.open.insert(OpenFile {
            slot,
            content,
            cursor: Cursor::zero(),
            dirty: false,
        }))
    }

    /// Commit the open file's content
    pub fn save_file(&mut self) -> SessionResult<()> {
        let file = self.open.as_mut().ok_or(SessionError::NoOpenFile)?;
        self.storage.save_content(&file.content, file.slot)?;
        file.dirty = false;
        log::info!("saved slot {}", file.slot);
        Ok(())
    }

    /// Drop the resident file without saving
    pub fn close_file(&mut self) -> Option<OpenFile> {
        self.open.take()
    }

    /// Wipe every file and name
    pub fn erase_all(&mut self) -> SessionResult<()> {
        self.storage.erase_all()?;
        self.index = FileIndex::new();
        self.open = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::{FILE_SLOTS, LINE_CAPACITY};
    use hal::{HostInterrupts, RamFlash};
    use services_storage::FlashLayout;

    fn session() -> EditorSession<RamFlash, HostInterrupts> {
        let storage = FlashPersistence::new(
            RamFlash::with_capacity_kb(128),
            HostInterrupts::new(),
            FlashLayout::top_of_flash(128 * 1024, 4096, 256),
        )
        .unwrap();
        EditorSession::start(storage).unwrap()
    }

    fn session_with_file(slot: usize) -> EditorSession<RamFlash, HostInterrupts> {
        let mut session = session();
        session.create_file(slot, b"file").unwrap();
        session.open_file(slot).unwrap();
        session
    }

    fn type_text(session: &mut EditorSession<RamFlash, HostInterrupts>, text: &[u8]) {
        for &ch in text {
            session.add_char(ch).unwrap();
        }
    }

    #[test]
    fn test_edits_need_open_file() {
        let mut session = session();
        assert_eq!(session.add_char(b'a'), Err(SessionError::NoOpenFile));
        assert_eq!(session.backspace(), Err(SessionError::NoOpenFile));
        assert_eq!(session.move_cursor(Motion::Left), Err(SessionError::NoOpenFile));
        assert_eq!(session.save_file(), Err(SessionError::NoOpenFile));
        assert!(session.line(0).is_none());
    }

    #[test]
    fn test_open_rejects_empty_and_out_of_range() {
        let mut session = session();
        assert_eq!(session.open_file(3).err(), Some(SessionError::EmptySlot(3)));
        assert_eq!(
            session.open_file(FILE_SLOTS).err(),
            Some(SessionError::Storage(StorageError::SlotOutOfRange(FILE_SLOTS)))
        );
    }

    #[test]
    fn test_typing_marks_dirty() {
        let mut session = session_with_file(0);
        assert!(!session.is_dirty());
        let changed = session.add_char(b'h').unwrap();
        assert!(changed.contains(0));
        assert!(session.is_dirty());
        assert_eq!(session.cursor(), Some(Cursor::new(0, 1)));
        assert_eq!(session.line(0).unwrap().as_bytes(), b"h");
    }

    #[test]
    fn test_unprintable_rejected() {
        let mut session = session_with_file(0);
        assert_eq!(session.add_char(b'\n'), Err(SessionError::Unprintable(b'\n')));
        assert_eq!(session.add_char(0xFF), Err(SessionError::Unprintable(0xFF)));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_capacity_error_reported() {
        let mut session = session_with_file(0);
        for _ in 0..LINE_CAPACITY {
            session.add_char(b'x').unwrap();
        }
        session.move_cursor(Motion::LineStart).unwrap();
        session.split_line().unwrap();
        session.move_cursor(Motion::LastLine).unwrap();
        assert_eq!(
            session.split_line(),
            Err(SessionError::Edit(EditError::CapacityExceeded))
        );
    }

    #[test]
    fn test_save_clears_dirty_and_persists() {
        let mut session = session_with_file(2);
        type_text(&mut session, b"hello");
        session.save_file().unwrap();
        assert!(!session.is_dirty());

        session.close_file();
        session.open_file(2).unwrap();
        assert_eq!(session.line(0).unwrap().as_bytes(), b"hello");
        assert_eq!(session.cursor(), Some(Cursor::zero()));
    }

    #[test]
    fn test_reopen_discards_unsaved_changes_and_resets_mode() {
        let mut session = session_with_file(1);
        session.toggle_mode();
        type_text(&mut session, b"lost");
        session.open_file(1).unwrap();
        assert_eq!(session.line(0).unwrap().len(), 0);
        assert_eq!(session.mode(), EditMode::ShiftInsert);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_delete_open_file_closes_it() {
        let mut session = session_with_file(4);
        session.delete_file(4).unwrap();
        assert!(session.open().is_none());
        assert!(session.slot(4).unwrap().is_empty());
    }

    #[test]
    fn test_delete_other_file_keeps_open_file() {
        let mut session = session_with_file(4);
        session.create_file(5, b"other").unwrap();
        session.delete_file(5).unwrap();
        assert_eq!(session.open().map(OpenFile::slot), Some(4));
    }

    #[test]
    fn test_create_on_used_slot_keeps_old_file() {
        let mut session = session_with_file(3);
        type_text(&mut session, b"private");
        session.save_file().unwrap();

        assert_eq!(
            session.create_file(3, b"new"),
            Err(SessionError::Storage(StorageError::SlotInUse(3)))
        );
        assert_eq!(session.slot(3).unwrap().name(), b"file");
    }

    #[test]
    fn test_commit_name_creates_then_renames() {
        let mut session = session();
        let mut entry = NameEntry::new();
        for &ch in b"draft" {
            entry.insert(ch).unwrap();
        }
        session.commit_name(7, &entry).unwrap();
        assert_eq!(session.slot(7).unwrap().name(), b"draft");

        let mut entry = session.begin_rename(7).unwrap();
        entry.insert(b'2').unwrap();
        session.commit_name(7, &entry).unwrap();
        assert_eq!(session.slot(7).unwrap().name(), b"draft2");

        assert_eq!(session.begin_rename(8).err(), Some(SessionError::EmptySlot(8)));
    }

    #[test]
    fn test_erase_all_resets_session() {
        let mut session = session_with_file(0);
        session.erase_all().unwrap();
        assert!(session.open().is_none());
        assert_eq!(session.index().file_count(), 0);
    }
}
