//! 设备注册表
//!
//! 启动时一次性创建全部设备实例，编号 `0..n-1`，之后只读；拆除时统一释放。
//! 设备节点的创建和主/次设备号由宿主的注册层负责，这里只提供按编号查找。

use alloc::vec::Vec;

use log::info;
use sync::WaitContext;

use crate::config::RamDevConfig;
use crate::device::{DeviceInstance, DeviceStats};
use crate::error::DevError;

/// 设备注册表
#[derive(Debug)]
pub struct Registry {
    devices: Vec<DeviceInstance>,
    config: RamDevConfig,
}

impl Registry {
    /// 以默认初始容量创建 `count` 个设备
    pub fn initialize(count: usize) -> Result<Self, DevError> {
        Self::initialize_with(&RamDevConfig {
            num_devices: count,
            ..RamDevConfig::default()
        })
    }

    /// 按配置创建设备
    ///
    /// 任一分配失败都会让整个初始化失败，已创建的设备随之释放。
    pub fn initialize_with(config: &RamDevConfig) -> Result<Self, DevError> {
        let mut devices = Vec::new();
        devices.try_reserve_exact(config.num_devices)?;

        for identity in 0..config.num_devices {
            let device = DeviceInstance::new(identity, config.initial_capacity)?;
            info!(
                "registered {} ({} bytes)",
                device.name(),
                config.initial_capacity
            );
            devices.push(device);
        }

        Ok(Self {
            devices,
            config: *config,
        })
    }

    /// 按编号查找设备
    pub fn instance(&self, identity: usize) -> Result<&DeviceInstance, DevError> {
        self.devices.get(identity).ok_or(DevError::NoDevice)
    }

    /// 设备数量
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// 是否没有任何设备
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// 创建时使用的配置
    pub fn config(&self) -> &RamDevConfig {
        &self.config
    }

    /// 遍历所有设备
    pub fn iter(&self) -> impl Iterator<Item = &DeviceInstance> {
        self.devices.iter()
    }

    /// 获取所有设备的状态快照
    pub fn stats(&self, ctx: &dyn WaitContext) -> Result<Vec<DeviceStats>, DevError> {
        self.devices.iter().map(|device| device.stats(ctx)).collect()
    }

    /// 拆除注册表，释放全部设备
    ///
    /// 消耗自身，因此只能调用一次，且所有会话必须已经结束。
    pub fn teardown(self) {
        for device in self.devices {
            info!("device node {} removed", device.name());
        }
        info!("devices unregistered");
    }
}
