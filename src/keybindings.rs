//! Keyboard shortcuts for the editor.
//!
//! Undo/redo follow the platform convention (Cmd on macOS, Ctrl elsewhere);
//! tool hotkeys are single unmodified letters and can be rebound.

use serde::{Deserialize, Serialize};

use crate::config::Platform;
use crate::interaction::Tool;

/// Keys the editor reacts to. Hosts map their native key codes onto this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// A printable character, lowercase
    Char(char),
}

/// Modifier state at the time of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS, Windows key elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Whether the platform's primary shortcut modifier is held.
    pub fn primary(&self, platform: Platform) -> bool {
        match platform {
            Platform::Mac => self.meta,
            Platform::Other => self.ctrl,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Editor command resolved from a key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shortcut {
    Undo,
    Redo,
    DeleteSelection,
    Cancel,
    SelectTool(Tool),
    /// Move the selection by a stage pixel delta
    Nudge { dx: f32, dy: f32 },
}

/// Keybinding configuration for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Hotkey for the rectangle mask tool
    pub tool_mask_rect: char,
    /// Hotkey for the ellipse mask tool
    pub tool_mask_ellipse: char,
    /// Hotkey for the pan tool
    pub tool_pan: char,
    /// Hotkey for the text tool
    pub tool_text: char,
    /// Hotkey for the crop tool
    pub tool_crop: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            tool_mask_rect: 'r',
            tool_mask_ellipse: 'e',
            tool_pan: 'h',
            tool_text: 't',
            tool_crop: 'c',
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tool that corresponds to a key, if any.
    pub fn tool_for_key(&self, c: char) -> Option<Tool> {
        let c = c.to_ascii_lowercase();
        Tool::all().iter().copied().find(|tool| self.key_for_tool(*tool) == c)
    }

    /// Get the hotkey for a specific tool.
    pub fn key_for_tool(&self, tool: Tool) -> char {
        match tool {
            Tool::MaskRect => self.tool_mask_rect,
            Tool::MaskEllipse => self.tool_mask_ellipse,
            Tool::Pan => self.tool_pan,
            Tool::Text => self.tool_text,
            Tool::Crop => self.tool_crop,
        }
    }

    /// Set the hotkey for a tool.
    pub fn set_tool_key(&mut self, tool: Tool, key: char) {
        let key = key.to_ascii_lowercase();
        match tool {
            Tool::MaskRect => self.tool_mask_rect = key,
            Tool::MaskEllipse => self.tool_mask_ellipse = key,
            Tool::Pan => self.tool_pan = key,
            Tool::Text => self.tool_text = key,
            Tool::Crop => self.tool_crop = key,
        }
    }

    /// Check if any tool hotkey is bound twice.
    pub fn has_conflicts(&self) -> bool {
        let keys: Vec<char> = Tool::all().iter().map(|t| self.key_for_tool(*t)).collect();
        keys.iter()
            .enumerate()
            .any(|(i, k)| keys[i + 1..].contains(k))
    }

    /// Resolve a key press into an editor command.
    pub fn resolve(&self, key: Key, mods: Modifiers, platform: Platform, nudge_step: f32, fast_multiplier: f32) -> Option<Shortcut> {
        if mods.primary(platform) {
            return match key {
                Key::Char('z') if mods.shift => Some(Shortcut::Redo),
                Key::Char('z') => Some(Shortcut::Undo),
                Key::Char('y') if platform == Platform::Other => Some(Shortcut::Redo),
                _ => None,
            };
        }
        if mods.ctrl || mods.meta || mods.alt {
            return None;
        }

        let step = if mods.shift {
            nudge_step * fast_multiplier
        } else {
            nudge_step
        };
        match key {
            Key::Delete | Key::Backspace => Some(Shortcut::DeleteSelection),
            Key::Escape => Some(Shortcut::Cancel),
            Key::ArrowLeft => Some(Shortcut::Nudge { dx: -step, dy: 0.0 }),
            Key::ArrowRight => Some(Shortcut::Nudge { dx: step, dy: 0.0 }),
            Key::ArrowUp => Some(Shortcut::Nudge { dx: 0.0, dy: -step }),
            Key::ArrowDown => Some(Shortcut::Nudge { dx: 0.0, dy: step }),
            Key::Char(c) if !mods.shift => self.tool_for_key(c).map(Shortcut::SelectTool),
            _ => None,
        }
    }
}
