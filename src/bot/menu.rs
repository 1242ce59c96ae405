//! 机器人菜单与命令
//!
//! 菜单和命令组成一棵显式的节点树，启动时注册到 `Composer`，
//! 消息和回调处理函数只向 `Composer` 询问要回复什么。

use std::collections::HashMap;

use teloxide::types::{BotCommand, InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};
use url::Url;

/// 主菜单回复文本
pub const START_MENU_TEXT: &str = "🏡 Главное меню";

const MENU_CALLBACK_PREFIX: &str = "menu:";

/// 节点：菜单或命令
#[derive(Debug, Clone)]
pub enum Node {
    Menu(Menu),
    Command(Command),
}

#[derive(Debug, Clone)]
pub struct Menu {
    pub id: String,
    pub rows: Vec<Vec<Button>>,
}

#[derive(Debug, Clone)]
pub enum Button {
    WebApp { label: String, url: Url },
    Url { label: String, url: Url },
    Submenu { label: String, menu: Menu },
    Back { label: String },
}

/// 斜杠命令：回复固定文本，可附带菜单键盘
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub reply: String,
    pub menu: Option<String>,
}

/// 命令的回复内容
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Menu {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }
}

#[derive(Debug, Default)]
pub struct Composer {
    menus: HashMap<String, Menu>,
    parents: HashMap<String, String>,
    commands: Vec<Command>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册节点；菜单会连同其子菜单一起注册
    pub fn register(mut self, node: Node) -> Self {
        match node {
            Node::Menu(menu) => self.register_menu(menu, None),
            Node::Command(command) => self.commands.push(command),
        }
        self
    }

    fn register_menu(&mut self, menu: Menu, parent: Option<&str>) {
        if let Some(parent) = parent {
            self.parents.insert(menu.id.clone(), parent.to_string());
        }
        for button in menu.rows.iter().flatten() {
            if let Button::Submenu { menu: child, .. } = button {
                self.register_menu(child.clone(), Some(&menu.id));
            }
        }
        self.menus.insert(menu.id.clone(), menu);
    }

    pub fn has_menu(&self, id: &str) -> bool {
        self.menus.contains_key(id)
    }

    /// 供 setMyCommands 使用的命令列表
    pub fn bot_commands(&self) -> Vec<BotCommand> {
        self.commands
            .iter()
            .map(|command| BotCommand::new(command.name.clone(), command.description.clone()))
            .collect()
    }

    /// 渲染菜单键盘
    pub fn render(&self, menu_id: &str) -> Option<InlineKeyboardMarkup> {
        let menu = self.menus.get(menu_id)?;
        let rows = menu
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|button| self.render_button(menu_id, button))
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty());

        Some(InlineKeyboardMarkup::new(rows))
    }

    fn render_button(&self, menu_id: &str, button: &Button) -> Option<InlineKeyboardButton> {
        match button {
            Button::WebApp { label, url } => Some(InlineKeyboardButton::web_app(
                label.clone(),
                WebAppInfo { url: url.clone() },
            )),
            Button::Url { label, url } => Some(InlineKeyboardButton::url(label.clone(), url.clone())),
            Button::Submenu { label, menu } => Some(InlineKeyboardButton::callback(
                label.clone(),
                format!("{}{}", MENU_CALLBACK_PREFIX, menu.id),
            )),
            // 顶层菜单没有返回按钮
            Button::Back { label } => self.parents.get(menu_id).map(|parent| {
                InlineKeyboardButton::callback(
                    label.clone(),
                    format!("{}{}", MENU_CALLBACK_PREFIX, parent),
                )
            }),
        }
    }

    fn find_command(&self, text: &str) -> Option<&Command> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        // `/start@SomeBot` 也算
        let name = name.split('@').next().unwrap_or(name);
        self.commands.iter().find(|command| command.name == name)
    }

    /// 消息文本对应的命令回复
    pub fn reply_to(&self, text: &str) -> Option<Reply> {
        let command = self.find_command(text)?;
        Some(Reply {
            text: command.reply.clone(),
            keyboard: command.menu.as_deref().and_then(|id| self.render(id)),
        })
    }

    /// 回调数据对应的目标菜单键盘
    pub fn navigate(&self, callback_data: &str) -> Option<InlineKeyboardMarkup> {
        let target = callback_data.strip_prefix(MENU_CALLBACK_PREFIX)?;
        self.render(target)
    }
}

/// 主菜单
pub fn start_menu(mini_app_url: Option<&Url>, site_url: Option<&Url>) -> Menu {
    let mut contacts = Menu::new("contacts");
    if let Some(site) = site_url {
        contacts = contacts.row(vec![Button::Url {
            label: "🌐 Сайт".to_string(),
            url: site.clone(),
        }]);
    }
    contacts = contacts.row(vec![Button::Back {
        label: "⬅️ Назад".to_string(),
    }]);

    let mut menu = Menu::new("start");
    if let Some(url) = mini_app_url {
        menu = menu.row(vec![Button::WebApp {
            label: "📅 Забронировать".to_string(),
            url: url.clone(),
        }]);
    }
    menu.row(vec![Button::Submenu {
        label: "📞 Контакты".to_string(),
        menu: contacts,
    }])
}

/// start 命令，回复主菜单
pub fn start_command() -> Command {
    Command {
        name: "start".to_string(),
        description: "Главное меню".to_string(),
        reply: START_MENU_TEXT.to_string(),
        menu: Some("start".to_string()),
    }
}

/// 顶层菜单组合
pub fn compose(mini_app_url: Option<&Url>, site_url: Option<&Url>) -> Composer {
    Composer::new()
        .register(Node::Menu(start_menu(mini_app_url, site_url)))
        .register(Node::Command(start_command()))
}
