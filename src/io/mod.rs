mod buf;
mod buf_ext;
mod buf_mut;

#[cfg(test)]
pub(crate) mod mock;

pub(crate) use buf::Buf;
pub(crate) use buf_ext::{MySqlBufExt, MySqlBufMutExt};
pub(crate) use buf_mut::BufMut;
