// ==========================================
// 零售生产与补货核心 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口 (不包含实现)
// 红线: 不包含配置写入、不包含业务逻辑
// 说明: 取值非法时回退默认值,不中断调用
// ==========================================

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager
pub trait EngineConfigReader: Send + Sync {
    // ===== 排程配置 =====

    /// 每日产能小时数
    ///
    /// # 默认值
    /// - 8.0
    fn get_daily_capacity_hours(&self) -> f64;

    /// 默认缓冲时长 (小时)
    ///
    /// # 默认值
    /// - 0.0
    fn get_default_buffer_hours(&self) -> f64;

    // ===== 补货配置 =====

    /// 低库存 CRITICAL 阈值 (相对 min_level)
    ///
    /// # 默认值
    /// - 0.25
    fn get_low_stock_critical_ratio(&self) -> f64;

    /// 低库存 HIGH 阈值 (相对 min_level)
    ///
    /// # 默认值
    /// - 0.5
    fn get_low_stock_high_ratio(&self) -> f64;

    /// 补货引擎开关 (由外部调度在调用前检查)
    ///
    /// # 默认值
    /// - true
    fn is_replenishment_enabled(&self) -> bool;

    // ===== 环境监控 =====

    fn get_temperature_tolerance_c(&self) -> f64;

    fn get_humidity_tolerance_pct(&self) -> f64;

    // ===== 展示 =====

    /// 消息语言
    ///
    /// # 默认值
    /// - zh-CN
    fn get_locale(&self) -> String;
}
