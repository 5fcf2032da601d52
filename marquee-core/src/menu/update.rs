use std::fmt::Debug;

use crate::error::Result;
use crate::menu::{HoverIntentMenu, MenuMessage};

/// Route one view message into the menu.
pub fn menu_update<K, S>(
    menu: &mut HoverIntentMenu<K, S>,
    message: MenuMessage<K, S>,
) -> Result<()>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    match message {
        MenuMessage::PointerEnter(id) => menu.pointer_enter(id),
        MenuMessage::PointerLeave => menu.pointer_leave(),
        MenuMessage::Click(id) => menu.click(id),
        MenuMessage::SubPointerEnter(sub) => menu.sub_pointer_enter(sub),
        MenuMessage::SubClick(sub) => menu.sub_click(sub),
        MenuMessage::SubPointerLeave => menu.sub_pointer_leave(),
        MenuMessage::Close => menu.close(),
        MenuMessage::TimerFired(token) => {
            menu.on_timer(token);
            Ok(())
        }
        MenuMessage::Dispose => menu.dispose(),
    }
}
