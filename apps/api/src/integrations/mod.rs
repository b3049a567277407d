// Third-party meeting sources.

pub mod readai;
