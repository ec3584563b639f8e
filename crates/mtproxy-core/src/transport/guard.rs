//! RAII guard that disconnects a connection when dropped.

use super::Connection;
use std::ops::{Deref, DerefMut};

/// Owns a connection for the duration of one call and disconnects it on every
/// exit path, including early returns through `?`.
pub struct ConnectionGuard<C: Connection> {
    conn: C,
}

impl<C: Connection> ConnectionGuard<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

impl<C: Connection> Deref for ConnectionGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.conn
    }
}

impl<C: Connection> DerefMut for ConnectionGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.conn
    }
}

impl<C: Connection> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        self.conn.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl Connection for Counting {
        fn write_body(&mut self, _body: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        }
        fn response_code(&mut self) -> io::Result<u32> {
            Ok(200)
        }
        fn input_stream(&mut self) -> io::Result<Box<dyn Read + '_>> {
            Ok(Box::new(io::empty()))
        }
        fn error_stream(&mut self) -> io::Result<Box<dyn Read + '_>> {
            Ok(Box::new(io::empty()))
        }
        fn disconnect(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fails_midway(count: Arc<AtomicUsize>) -> io::Result<()> {
        let mut guard = ConnectionGuard::new(Counting(count));
        guard.write_body(b"x")?;
        Ok(())
    }

    #[test]
    fn disconnects_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let _guard = ConnectionGuard::new(Counting(Arc::clone(&count)));
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disconnects_on_error_return() {
        let count = Arc::new(AtomicUsize::new(0));
        assert!(fails_midway(Arc::clone(&count)).is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
