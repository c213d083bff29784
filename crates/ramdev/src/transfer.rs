//! 用户缓冲区拷贝原语
//!
//! 对应驱动中的 `copy_to_user` / `copy_from_user`：拷贝可能因用户页不可访问而提前终止，
//! 返回值是实际传输的字节数，可能小于请求长度。设备层按实际值推进读写位置。

/// 读操作的目标缓冲区
pub trait UserWriter {
    /// 缓冲区可容纳的字节数，即本次读请求的长度
    fn len(&self) -> usize;

    /// 缓冲区是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 将 `src` 拷贝到缓冲区开头，返回实际拷贝的字节数
    fn copy_to_user(&mut self, src: &[u8]) -> usize;
}

/// 写操作的来源缓冲区
pub trait UserReader {
    /// 缓冲区中的字节数，即本次写请求的长度
    fn len(&self) -> usize;

    /// 缓冲区是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 从缓冲区开头拷贝到 `dst`，返回实际拷贝的字节数
    fn copy_from_user(&self, dst: &mut [u8]) -> usize;
}

impl UserWriter for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to_user(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(<[u8]>::len(self));
        self[..n].copy_from_slice(&src[..n]);
        n
    }
}

impl UserReader for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_from_user(&self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(<[u8]>::len(self));
        dst[..n].copy_from_slice(&self[..n]);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_copies_are_complete() {
        let mut dst = [0u8; 4];
        assert_eq!(UserWriter::copy_to_user(&mut dst[..], b"abcd"), 4);
        assert_eq!(&dst, b"abcd");

        let src: &[u8] = b"wxyz";
        let mut out = [0u8; 4];
        assert_eq!(src.copy_from_user(&mut out), 4);
        assert_eq!(&out, b"wxyz");
    }

    #[test]
    fn test_empty_slice() {
        let empty: &[u8] = &[];
        assert!(UserReader::is_empty(empty));
        assert_eq!(UserReader::len(empty), 0);
    }
}
