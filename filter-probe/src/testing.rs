//! Test helpers.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// A report sink whose contents stay readable after it has been handed to an
/// [`Observer`](crate::observer::Observer).
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("report output is utf-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
