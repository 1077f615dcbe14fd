pub(crate) mod lookup;
pub(crate) mod secrets;
pub(crate) mod watch;
