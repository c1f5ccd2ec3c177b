//! visitor pattern helpers
mod visit_leaves;
pub use visit_leaves::VisitLeaves;

/// Visitor that visits its subjects along with their location
pub trait Visit<T: ?Sized> {
    fn visit(&mut self, path: &crate::path::Path, value: &T);
}

// blanket impl for FnMut
impl<T, F> Visit<T> for F
where
    T: ?Sized,
    F: FnMut(&crate::path::Path, &T),
{
    fn visit(&mut self, path: &crate::path::Path, value: &T) {
        self(path, value)
    }
}
