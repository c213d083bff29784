//! 设备配置
//!
//! 设备数量和初始容量在加载时确定，可通过内核命令行参数覆盖：
//!
//! ```text
//! ramdev.num_devices=5 ramdev.capacity=0x20000
//! ```

use log::warn;

/// 页大小
pub const PAGE_SIZE: usize = 4096;

/// 默认设备数量
pub const DEFAULT_NUM_DEVICES: usize = 3;

/// 默认的每设备初始容量（16 页）
pub const DEFAULT_CAPACITY: usize = 16 * PAGE_SIZE;

/// 命令行参数前缀
const CMDLINE_PREFIX: &str = "ramdev.";

/// 设备注册表配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamDevConfig {
    /// 设备数量
    pub num_devices: usize,

    /// 每个设备的初始容量（字节）
    pub initial_capacity: usize,
}

impl Default for RamDevConfig {
    fn default() -> Self {
        Self {
            num_devices: DEFAULT_NUM_DEVICES,
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl RamDevConfig {
    /// 从内核命令行（bootargs）解析配置
    ///
    /// 只识别 `ramdev.` 前缀的参数；未知参数和无法解析的值会被忽略并保留默认值。
    pub fn from_cmdline(cmdline: &str) -> Self {
        let mut config = Self::default();

        for arg in cmdline.split_whitespace() {
            let Some(param) = arg.strip_prefix(CMDLINE_PREFIX) else {
                continue;
            };
            let Some((key, value)) = param.split_once('=') else {
                warn!("ramdev: parameter '{}' has no value, ignored", arg);
                continue;
            };
            let Some(value) = parse_size(value) else {
                warn!("ramdev: bad value in '{}', ignored", arg);
                continue;
            };
            match key {
                "num_devices" => config.num_devices = value,
                "capacity" => config.initial_capacity = value,
                _ => warn!("ramdev: unknown parameter '{}', ignored", arg),
            }
        }

        config
    }
}

/// 解析十进制或 `0x` 前缀的十六进制数
fn parse_size(s: &str) -> Option<usize> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RamDevConfig::default();
        assert_eq!(config.num_devices, 3);
        assert_eq!(config.initial_capacity, 65536);
    }

    #[test]
    fn test_from_cmdline() {
        let config =
            RamDevConfig::from_cmdline("console=ttyS0 ramdev.num_devices=5 ramdev.capacity=0x2000");
        assert_eq!(config.num_devices, 5);
        assert_eq!(config.initial_capacity, 0x2000);
    }

    #[test]
    fn test_from_cmdline_ignores_garbage() {
        let config = RamDevConfig::from_cmdline(
            "ramdev.num_devices=abc ramdev.capacity ramdev.colour=7 root=/dev/vda",
        );
        assert_eq!(config, RamDevConfig::default());
    }

    #[test]
    fn test_empty_cmdline() {
        assert_eq!(RamDevConfig::from_cmdline(""), RamDevConfig::default());
    }
}
