//! BDD step definitions for settings resolution

use cucumber::{given, then, when};

use dashboard::settings::{Setting, SettingEntry, SettingGroup, SettingValue, SettingsTree};

use crate::world::DashboardWorld;

fn group_mut<'a>(groups: &'a mut [SettingGroup], path: &str) -> &'a mut SettingGroup {
    let mut segments = path.split('/');
    let first = segments.next().expect("empty group path");
    let mut current = groups
        .iter_mut()
        .find(|g| g.id == first)
        .unwrap_or_else(|| panic!("unknown root group {first}"));
    for segment in segments {
        current = current
            .children
            .iter_mut()
            .find_map(|entry| match entry {
                SettingEntry::Group(g) if g.id == segment => Some(g),
                _ => None,
            })
            .unwrap_or_else(|| panic!("unknown group {segment} in {path}"));
    }
    current
}

#[given(expr = "a settings group {string}")]
fn settings_group(world: &mut DashboardWorld, id: String) {
    world.groups.push(SettingGroup::new(id.clone(), id));
}

#[given(expr = "group {string} has a subgroup {string}")]
fn subgroup(world: &mut DashboardWorld, parent: String, id: String) {
    let group = group_mut(&mut world.groups, &parent);
    group
        .children
        .push(SettingEntry::Group(SettingGroup::new(id.clone(), id)));
}

#[given(expr = "group {string} has an integer setting {string} with value {int}")]
fn integer_setting(world: &mut DashboardWorld, parent: String, id: String, value: i64) {
    let group = group_mut(&mut world.groups, &parent);
    group.children.push(SettingEntry::Setting(Setting::new(
        id.clone(),
        id,
        SettingValue::Integer(value),
    )));
}

#[when(expr = "I resolve {string}")]
fn resolve_path(world: &mut DashboardWorld, path: String) {
    let tree = SettingsTree::new(world.groups.clone()).expect("settings tree should be valid");
    world.resolved = tree.resolve_str(&path).cloned();
}

#[then(expr = "the resolved setting is {string} with value {int}")]
fn resolved_setting(world: &mut DashboardWorld, id: String, value: i64) {
    let setting = world.resolved.as_ref().expect("expected a setting");
    assert_eq!(setting.id, id);
    assert_eq!(setting.value, SettingValue::Integer(value));
}

#[then("no setting is found")]
fn no_setting(world: &mut DashboardWorld) {
    assert!(
        world.resolved.is_none(),
        "expected no setting, got {:?}",
        world.resolved
    );
}
