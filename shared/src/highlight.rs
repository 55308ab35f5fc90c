use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::MapModel;
use crate::style::HighlightStyle;
use crate::territory::TerritoryId;
use crate::unit::UnitKey;

/// Instruction for the rendering surface or tooltip overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MapCommand {
    SetFill { unit: UnitKey, style: HighlightStyle },
    ShowTooltip { html: String },
    MoveTooltip { x: f64, y: f64 },
    HideTooltip,
    ScrollIntoView { card_id: String },
}

impl MapCommand {
    pub fn fill(unit: &UnitKey, style: HighlightStyle) -> Self {
        Self::SetFill {
            unit: unit.clone(),
            style,
        }
    }
}

/// Anything that can carry out [`MapCommand`]s.
pub trait MapSurface {
    fn set_fill(&mut self, unit: &UnitKey, style: HighlightStyle);
    fn show_tooltip(&mut self, html: &str);
    fn move_tooltip(&mut self, x: f64, y: f64);
    fn hide_tooltip(&mut self);
    fn scroll_into_view(&mut self, card_id: &str);

    fn apply(&mut self, command: &MapCommand) {
        match command {
            MapCommand::SetFill { unit, style } => self.set_fill(unit, *style),
            MapCommand::ShowTooltip { html } => self.show_tooltip(html),
            MapCommand::MoveTooltip { x, y } => self.move_tooltip(*x, *y),
            MapCommand::HideTooltip => self.hide_tooltip(),
            MapCommand::ScrollIntoView { card_id } => self.scroll_into_view(card_id),
        }
    }

    fn apply_all(&mut self, commands: &[MapCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// The single active highlight group, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    pub territory: Option<TerritoryId>,
    pub focused: Option<UnitKey>,
}

impl HighlightState {
    pub fn is_empty(&self) -> bool {
        self.focused.is_none()
    }
}

/// Turns pointer events on units into style and tooltip commands.
///
/// The controller is the only owner of [`HighlightState`]. Exits always reset
/// the territory recorded at enter time, so a late or duplicated exit for a
/// unit that is no longer focused cannot disturb the current focus.
#[derive(Debug, Clone)]
pub struct HighlightController {
    model: Arc<MapModel>,
    state: HighlightState,
}

impl HighlightController {
    pub fn new(model: Arc<MapModel>) -> Self {
        Self {
            model,
            state: HighlightState::default(),
        }
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    pub fn on_enter(&mut self, unit: &UnitKey) -> Vec<MapCommand> {
        let mut commands = Vec::new();
        if self.state.focused.as_ref().is_some_and(|focused| focused != unit) {
            commands.extend(self.reset_active());
        }

        let territory = self.model.index.lookup(unit).cloned();
        let members = self.group_members(unit, territory.as_deref());
        commands.extend(members.iter().map(|member| {
            let style = if member == unit {
                HighlightStyle::Focused
            } else {
                HighlightStyle::CoHighlighted
            };
            MapCommand::fill(member, style)
        }));
        commands.push(MapCommand::ShowTooltip {
            html: self.model.tooltip_for(unit).to_html(),
        });

        self.state = HighlightState {
            territory,
            focused: Some(unit.clone()),
        };
        commands
    }

    /// [`Self::on_enter`] with the pointer position, so the tooltip is placed
    /// before it is shown.
    pub fn on_enter_at(&mut self, unit: &UnitKey, x: f64, y: f64) -> Vec<MapCommand> {
        let mut commands = self.on_move(x, y);
        commands.extend(self.on_enter(unit));
        commands
    }

    pub fn on_exit(&mut self, unit: &UnitKey) -> Vec<MapCommand> {
        let Some(focused) = self.state.focused.clone() else {
            return Vec::new();
        };
        if &focused == unit {
            let mut commands = self.reset_active();
            commands.push(MapCommand::HideTooltip);
            return commands;
        }
        // Stale exit: only re-clear the unit itself, and only if it is outside
        // the group that is lit right now.
        if self.active_members().contains(unit) {
            Vec::new()
        } else {
            vec![MapCommand::fill(unit, HighlightStyle::Baseline)]
        }
    }

    pub fn on_move(&self, x: f64, y: f64) -> Vec<MapCommand> {
        vec![MapCommand::MoveTooltip { x, y }]
    }

    pub fn on_click(&self, unit: &UnitKey) -> Vec<MapCommand> {
        vec![MapCommand::ScrollIntoView {
            card_id: unit.card_id(),
        }]
    }

    /// Style `unit` should currently be drawn with.
    pub fn style_of(&self, unit: &UnitKey) -> HighlightStyle {
        match &self.state.focused {
            Some(focused) if focused == unit => HighlightStyle::Focused,
            Some(_) if self.active_members().contains(unit) => HighlightStyle::CoHighlighted,
            _ => HighlightStyle::Baseline,
        }
    }

    fn group_members(&self, unit: &UnitKey, territory: Option<&str>) -> Vec<UnitKey> {
        match territory {
            Some(territory) => self.model.index.members(territory).to_vec(),
            None => vec![unit.clone()],
        }
    }

    fn active_members(&self) -> Vec<UnitKey> {
        match &self.state.focused {
            Some(focused) => self.group_members(focused, self.state.territory.as_deref()),
            None => Vec::new(),
        }
    }

    fn reset_active(&mut self) -> Vec<MapCommand> {
        let commands: Vec<MapCommand> = self
            .active_members()
            .iter()
            .map(|member| MapCommand::fill(member, HighlightStyle::Baseline))
            .collect();
        self.state = HighlightState::default();
        commands
    }
}
