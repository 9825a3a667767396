pub(crate) mod categories;
pub(crate) mod expenses;
pub(crate) mod form;
