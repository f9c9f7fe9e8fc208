//! 几何与样式数据
//!
//! 对应浏览器中的 `getBoundingClientRect()` 与 `getComputedStyle()` 结果

use serde::{Deserialize, Serialize};

/// 节点的渲染矩形（视口坐标）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// 面积，宽高各自截断到 ≥0
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// 与视口 `[0,0]×[width,height]` 的交集面积
    pub fn overlap_with(&self, viewport: Viewport) -> f64 {
        let iw = (self.right().min(viewport.width) - self.x.max(0.0)).max(0.0);
        let ih = (self.bottom().min(viewport.height) - self.y.max(0.0)).max(0.0);
        iw * ih
    }
}

/// 当前视口尺寸（`innerWidth` / `innerHeight`）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// 计算样式中与可见性相关的三个属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_visibility() -> String {
    "visible".to_string()
}

fn default_opacity() -> f64 {
    1.0
}

impl ComputedStyle {
    pub fn with_display(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            visibility: default_visibility(),
            opacity: default_opacity(),
        }
    }

    /// 样式层面是否隐藏（不考虑尺寸）
    pub fn is_hidden(&self) -> bool {
        self.display == "none" || self.visibility == "hidden" || self.opacity == 0.0
    }
}
