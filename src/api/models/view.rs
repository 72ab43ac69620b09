use serde::Serialize;

/// 宿主应该切换到的页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NextView {
    Home,
    Camera,
    Profile,
}
