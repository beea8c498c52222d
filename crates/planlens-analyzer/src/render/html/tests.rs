//! Tests for the HTML tree renderer

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn scenario_plan() -> Value {
    json!({
        "Node Type": "Aggregate",
        "Plans": [
            {
                "Node Type": "Seq Scan",
                "Relation Name": "orders",
                "Filter": "status = 'open'",
                "Total Cost": 1200
            },
            {
                "Node Type": "Index Scan",
                "Relation Name": "users",
                "Index Name": "users_pkey",
                "Total Cost": 10
            }
        ],
        "Total Cost": 1210
    })
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html(r#"a & b < c > d "e" 'f'"#),
        "a &amp; b &lt; c &gt; d &quot;e&quot; &#39;f&#39;"
    );
    assert_eq!(escape_html("plain"), "plain");
    assert_eq!(escape_html(""), "");
}

#[test]
fn test_node_label() {
    assert_eq!(node_label(&PlanNode::default()), "Node");
    assert_eq!(node_label(&PlanNode::new("Sort")), "Sort");
    assert_eq!(
        node_label(&PlanNode::new("Sort").with_cost(12.5)),
        "Sort (cost: 12.5)"
    );
    assert_eq!(
        node_label(&PlanNode::new("Sort").with_cost("7")),
        "Sort (cost: 7)"
    );
}

#[test]
fn test_scenario_labels_and_nesting() {
    let html = render(&scenario_plan());

    assert!(html.starts_with("<ul class=\"plan-tree\"><li class=\"plan-node\">"));
    assert!(html.ends_with("</details></li></ul>"));
    assert_eq!(html.matches("<details open>").count(), 3);
    assert_eq!(html.matches("<ul class=\"plan-tree\">").count(), 1);
    assert_eq!(html.matches("<ul class=\"plan-children\">").count(), 1);

    let aggregate = html
        .find("<summary>Aggregate (cost: 1210)</summary>")
        .expect("aggregate label");
    let seq = html
        .find("<summary>Seq Scan (cost: 1200)</summary>")
        .expect("seq scan label");
    let idx = html
        .find("<summary>Index Scan (cost: 10)</summary>")
        .expect("index scan label");
    assert!(aggregate < seq && seq < idx);

    let children = html.find("<ul class=\"plan-children\">").unwrap();
    assert!(aggregate < children && children < seq);
}

#[test]
fn test_metadata_lines_escaped() {
    let html = render(&scenario_plan());
    assert!(html.contains(
        "<div class=\"plan-field\"><span class=\"plan-field-name\">Filter</span>: status = &#39;open&#39;</div>"
    ));
    assert!(html.contains("<span class=\"plan-field-name\">Index Name</span>: users_pkey"));
    assert!(!html.contains("'open'"));
}

#[test]
fn test_special_characters_never_raw() {
    let plan = json!({
        "Node Type": "<script>alert(1)</script>",
        "Filter": "a < 1 & b > 2 or c = \"x\" or d = 'y'",
        "Relation Name": "<b>t</b>"
    });
    let html = render(&plan);

    assert!(!html.contains("<script>"));
    assert!(!html.contains("<b>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains(
        "a &lt; 1 &amp; b &gt; 2 or c = &quot;x&quot; or d = &#39;y&#39;"
    ));
}

#[test]
fn test_unrecognized_leaf() {
    let html = render(&json!({"Plan Rows": 5}));
    assert_eq!(
        html,
        "<ul class=\"plan-tree\"><li class=\"plan-node\"><details open><summary>Node</summary><div class=\"plan-meta\"></div></details></li></ul>"
    );
}

#[test]
fn test_empty_root() {
    assert_eq!(render(&Value::Null), "<ul class=\"plan-tree\"></ul>");
    assert_eq!(render(&json!(false)), "<ul class=\"plan-tree\"></ul>");
    assert_eq!(render(&json!("Seq Scan")), "<ul class=\"plan-tree\"></ul>");
}

#[test]
fn test_metadata_field_order() {
    let plan = json!({
        "Actual Time": 0.5,
        "Sort Key": ["a", "b"],
        "Filter": "x",
        "Index Name": "i",
        "Relation Name": "r",
        "Actual Rows": 42
    });
    let html = render(&plan);
    let positions: Vec<_> = [
        "Relation Name",
        "Index Name",
        "Filter",
        "Sort Key",
        "Actual Rows",
        "Actual Time",
    ]
    .iter()
    .map(|name| {
        html.find(&format!("<span class=\"plan-field-name\">{name}</span>"))
            .expect(name)
    })
    .collect();

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(html.contains("Sort Key</span>: a, b</div>"));
    assert!(html.contains("Actual Rows</span>: 42</div>"));
}

#[test]
fn test_sort_key_fallbacks_use_primary_label() {
    assert_eq!(
        render(&json!({"Node Type": "Sort", "Sort Keys": ["a", "b"]})),
        "<ul class=\"plan-tree\"><li class=\"plan-node\"><details open><summary>Sort</summary>\
         <div class=\"plan-meta\"><div class=\"plan-field\"><span class=\"plan-field-name\">Sort Key</span>: a, b</div></div>\
         </details></li></ul>"
    );

    let html = render(&json!({"nodeType": "Sort", "relation": "orders", "sortKey": "amount DESC"}));
    assert!(html.contains(
        "<span class=\"plan-field-name\">Relation Name</span>: orders</div>\
         <div class=\"plan-field\"><span class=\"plan-field-name\">Sort Key</span>: amount DESC</div>"
    ));
    assert!(!html.contains("sortKey"));
    assert!(!html.contains("Sort Keys"));

    let html = render(&json!({"Node Type": "Sort", "Sort Key": ["x"], "Sort Keys": ["y"]}));
    assert!(html.contains("Sort Key</span>: x</div>"));
    assert!(!html.contains(": y</div>"));
}

#[test]
fn test_falsy_metadata_skipped() {
    let html = render(&json!({"Node Type": "Seq Scan", "Actual Rows": 0, "Filter": ""}));
    assert!(!html.contains("plan-field"));
}

#[test]
fn test_render_is_idempotent() {
    let plan = scenario_plan();
    assert_eq!(render(&plan), render(&plan));
}

#[test]
fn test_render_payload_unwraps_plan() {
    let payload = json!({"plan": scenario_plan()});
    assert_eq!(render_payload(&payload), render(&scenario_plan()));
}

#[test]
fn test_truncated_marker() {
    let plan = json!({
        "Node Type": "Limit",
        "Plans": [{"Node Type": "Seq Scan"}]
    });
    let renderer = TreeRenderer::new().with_limits(PlanLimits::new().with_max_depth(1));
    let html = renderer.render(&plan);

    assert!(html.contains("<ul class=\"plan-children\"><li class=\"plan-truncated\">"));
    assert!(!html.contains("Seq Scan"));
}

#[test]
fn test_wide_fan_out() {
    let children: Vec<_> = (0..10_000).map(|_| json!({"Node Type": "Result"})).collect();
    let html = render(&json!({"Node Type": "Append", "Plans": children}));
    assert_eq!(html.matches("<summary>Result</summary>").count(), 10_000);
}

#[test]
fn test_deep_chain_terminates() {
    let html = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| {
            let mut plan = json!({"Node Type": "Seq Scan"});
            for _ in 1..10_000 {
                plan = json!({"Node Type": "Limit", "Plans": [plan]});
            }
            render(&plan)
        })
        .expect("spawn")
        .join()
        .expect("join");

    assert_eq!(
        html.matches("<details open>").count(),
        PlanLimits::default().max_depth
    );
    assert_eq!(html.matches("plan-truncated").count(), 1);
}
