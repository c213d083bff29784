//! ioctl 命令编码
//!
//! 与 Linux `asm-generic/ioctl.h` 相同的布局：
//!
//! ```text
//!  31 30 | 29 .. 16 | 15 .. 8 | 7 .. 0
//!   dir  |   size   |  type   |   nr
//! ```

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;

const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

/// 无数据传输
pub const IOC_NONE: u32 = 0;
/// 用户向内核写
pub const IOC_WRITE: u32 = 1;
/// 内核向用户读
pub const IOC_READ: u32 = 2;

/// ramdev 的 ioctl 魔数
pub const RAMDEV_IOC_MAGIC: u8 = b'Z';

/// 清空设备：内容全部置零，逻辑大小和文件位置复位
pub const ASP_CLEAR_BUF: u32 = iow(RAMDEV_IOC_MAGIC, 1, core::mem::size_of::<i32>());

/// 组装命令号
pub const fn ioc(dir: u32, ty: u8, nr: u8, size: usize) -> u32 {
    (dir << IOC_DIRSHIFT)
        | ((ty as u32) << IOC_TYPESHIFT)
        | ((nr as u32) << IOC_NRSHIFT)
        | (((size as u32) & ((1 << IOC_SIZEBITS) - 1)) << IOC_SIZESHIFT)
}

/// `_IO`
pub const fn io(ty: u8, nr: u8) -> u32 {
    ioc(IOC_NONE, ty, nr, 0)
}

/// `_IOR`
pub const fn ior(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(IOC_READ, ty, nr, size)
}

/// `_IOW`
pub const fn iow(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(IOC_WRITE, ty, nr, size)
}

/// 取出命令号中的类型（魔数）
pub const fn ioc_type(cmd: u32) -> u8 {
    ((cmd >> IOC_TYPESHIFT) & ((1 << IOC_TYPEBITS) - 1)) as u8
}

/// 取出命令号中的序号
pub const fn ioc_nr(cmd: u32) -> u8 {
    ((cmd >> IOC_NRSHIFT) & ((1 << IOC_NRBITS) - 1)) as u8
}
