use abi_console_types::ReturnValue;
use alloy_primitives::{Address, TxHash, U256};

use crate::{
    connect, load,
    mock::MockContract,
    Catalog, ConsoleError, FeeReadout, Filter, Invocation, InvocationController, Resolution,
    Session, Status,
};

const TOKEN: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

const ERC20_ABI: &str = r#"[
    {"type":"function","name":"balanceOf","stateMutability":"view",
     "inputs":[{"name":"account","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"owner","stateMutability":"view",
     "inputs":[],"outputs":[{"name":"","type":"address"}]},
    {"type":"function","name":"mint","stateMutability":"nonpayable",
     "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[]},
    {"type":"function","name":"burn","stateMutability":"nonpayable",
     "inputs":[{"name":"amount","type":"uint256"}],"outputs":[]},
    {"type":"function","name":"transfer","stateMutability":"nonpayable",
     "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
     "outputs":[{"name":"","type":"bool"}]},
    {"type":"event","name":"Transfer","inputs":[
        {"indexed":true,"name":"from","type":"address"},
        {"indexed":true,"name":"to","type":"address"},
        {"indexed":false,"name":"value","type":"uint256"}]}
]"#;

fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

fn panel_index(session: &Session, name: &str) -> usize {
    session
        .panels()
        .iter()
        .position(|p| p.descriptor().name == name)
        .unwrap()
}

async fn loaded(mock: &mut MockContract) -> Session {
    let mut session = Session::default();
    load(&mut session, mock, ERC20_ABI, TOKEN).await.unwrap();
    session
}

#[test]
fn test_catalog_of_five_entries() {
    let abi = r#"[
        {"type":"constructor","inputs":[]},
        {"type":"function","name":"a","stateMutability":"view","inputs":[]},
        {"type":"event","name":"E","inputs":[]},
        {"type":"fallback","stateMutability":"nonpayable"},
        {"type":"function","name":"b","stateMutability":"payable","inputs":[]}
    ]"#;
    assert_eq!(Catalog::parse(abi).unwrap().len(), 2);
}

#[tokio::test]
async fn test_view_call_formats_scaled_balance() {
    let mut mock = MockContract::new().returning(
        "balanceOf(address)",
        ReturnValue::Uint(U256::from(1_500_000_000_000_000_000u128)),
    );
    let mut session = loaded(&mut mock).await;
    assert_eq!(session.scale(), 18);
    assert_eq!(mock.attached, Some(TOKEN.parse().unwrap()));

    let idx = panel_index(&session, "balanceOf");
    session
        .panel_mut(idx)
        .unwrap()
        .set_input(0, "0xAB5801A7D398351B8BE11C439E05C5B3259AEC9B")
        .unwrap();

    let controller = InvocationController::new(&mock);
    let result = controller.execute_panel(&mut session, idx).await.unwrap();
    assert_eq!(result, Invocation::Output("1.5".into()));
    assert_eq!(session.output(), Some("1.5"));
    assert_eq!(mock.count("call:balanceOf"), 1);
    assert_eq!(mock.count("submit:"), 0);
}

#[tokio::test]
async fn test_declined_confirmation_submits_nothing() {
    let mut mock = MockContract::new().with_estimate(51_000);
    let mut session = loaded(&mut mock).await;
    let before = session.status().clone();
    let reported = session.reported();

    let idx = panel_index(&session, "transfer");
    let panel = session.panel_mut(idx).unwrap();
    panel.set_input(0, "0x0000000000000000000000000000000000000001").unwrap();
    panel.set_input(1, "2.5").unwrap();

    let controller = InvocationController::new(&mock);
    let request = match controller.execute_panel(&mut session, idx).await.unwrap() {
        Invocation::AwaitingConfirmation(request) => request,
        other => panic!("expected confirmation, got {other:?}"),
    };
    assert_eq!(request.prompt, "Are you sure you want to execute transfer?");
    assert_eq!(request.estimate, FeeReadout::Estimated(U256::from(51_000u64)));

    let resolution = controller.resolve(&mut session, request.token, false).await.unwrap();
    assert_eq!(resolution, Resolution::Cancelled);
    assert_eq!(mock.count("submit:"), 0);
    assert_eq!(session.status(), &before);
    assert_eq!(session.reported(), reported);
    assert!(session.confirmation().pending().is_none());
}

#[tokio::test]
async fn test_accepted_confirmation_submits_then_confirms() {
    let mut mock = MockContract::new();
    let mut session = loaded(&mut mock).await;

    let idx = panel_index(&session, "burn");
    session.panel_mut(idx).unwrap().set_input(0, "1").unwrap();

    let controller = InvocationController::new(&mock);
    let request = match controller.execute_panel(&mut session, idx).await.unwrap() {
        Invocation::AwaitingConfirmation(request) => request,
        other => panic!("expected confirmation, got {other:?}"),
    };
    // Estimation failure is not fatal.
    assert_eq!(request.estimate, FeeReadout::Failed);

    let tx = TxHash::repeat_byte(0x11);
    let resolution = controller.resolve(&mut session, request.token, true).await.unwrap();
    assert_eq!(resolution, Resolution::Confirmed(tx));

    let history = session.status_history();
    assert_eq!(
        &history[history.len() - 2..],
        &[Status::Submitted(tx), Status::Confirmed(tx)]
    );
    let log = mock.log();
    let tail: Vec<&str> = log[log.len() - 3..].iter().map(String::as_str).collect();
    assert_eq!(tail, ["estimate:burn(uint256)", "submit:burn(uint256)", "finality"]);

    // The token is spent.
    assert!(controller.resolve(&mut session, request.token, true).await.is_err());
}

#[tokio::test]
async fn test_conversion_failure_aborts_before_any_call() {
    let mut mock = MockContract::new().with_estimate(21_000);
    let mut session = loaded(&mut mock).await;
    let calls_before = mock.log().len();

    let idx = panel_index(&session, "transfer");
    let panel = session.panel_mut(idx).unwrap();
    panel.set_input(0, "0x0000000000000000000000000000000000000001").unwrap();
    panel.set_input(1, "1.0000000000000000001").unwrap();

    let controller = InvocationController::new(&mock);
    let err = controller.execute_panel(&mut session, idx).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Conversion { ref field, .. } if field == "amount"));
    assert_eq!(mock.log().len(), calls_before);
    assert!(matches!(session.status(), Status::Error(_)));
    assert!(session.confirmation().pending().is_none());
}

#[tokio::test]
async fn test_read_failure_is_reported_not_fatal() {
    let mut mock = MockContract::new();
    let mut session = loaded(&mut mock).await;

    let idx = panel_index(&session, "balanceOf");
    session.panel_mut(idx).unwrap().set_input(0, "0x01").unwrap();
    let controller = InvocationController::new(&mock);
    assert!(controller.execute_panel(&mut session, idx).await.is_err());
    assert_eq!(session.status().to_string(), "Error: execution reverted");
    assert_eq!(session.output(), None);
}

#[tokio::test]
async fn test_submit_and_finality_failures() {
    let mut mock = MockContract::new();
    mock.fail_submit = true;
    let mut session = loaded(&mut mock).await;
    let idx = panel_index(&session, "burn");
    session.panel_mut(idx).unwrap().set_input(0, "3").unwrap();

    let controller = InvocationController::new(&mock);
    let Invocation::AwaitingConfirmation(request) =
        controller.execute_panel(&mut session, idx).await.unwrap()
    else {
        panic!("expected confirmation");
    };
    assert!(controller.resolve(&mut session, request.token, true).await.is_err());
    assert_eq!(session.status().to_string(), "Error: user rejected transaction");
    assert_eq!(mock.count("finality"), 0);

    let mut mock = MockContract::new();
    mock.fail_finality = true;
    let mut session = loaded(&mut mock).await;
    let idx = panel_index(&session, "burn");
    session.panel_mut(idx).unwrap().set_input(0, "3").unwrap();
    let controller = InvocationController::new(&mock);
    let Invocation::AwaitingConfirmation(request) =
        controller.execute_panel(&mut session, idx).await.unwrap()
    else {
        panic!("expected confirmation");
    };
    assert!(controller.resolve(&mut session, request.token, true).await.is_err());
    let history = session.status_history();
    assert!(matches!(history[history.len() - 2], Status::Submitted(_)));
    assert!(matches!(history[history.len() - 1], Status::Error(_)));
}

#[tokio::test]
async fn test_contract_decimals_drive_scaling() {
    let mut mock = MockContract::new()
        .with_decimals(6)
        .returning("balanceOf(address)", ReturnValue::Uint(U256::from(2_500_000u64)));
    let mut session = loaded(&mut mock).await;
    assert_eq!(session.scale(), 6);

    let idx = panel_index(&session, "balanceOf");
    session.panel_mut(idx).unwrap().set_input(0, "0x02").unwrap();
    let controller = InvocationController::new(&mock);
    let result = controller.execute_panel(&mut session, idx).await.unwrap();
    assert_eq!(result, Invocation::Output("2.5".into()));

    let idx = panel_index(&session, "transfer");
    let panel = session.panel_mut(idx).unwrap();
    panel.set_input(0, "0x02").unwrap();
    panel.set_input(1, "0.0000001").unwrap();
    assert!(controller.execute_panel(&mut session, idx).await.is_err());
}

#[tokio::test]
async fn test_owner_gates_privileged_panels() {
    let mut mock = MockContract::new().with_owner(addr(0xaa)).with_caller(addr(0xbb));
    let mut session = Session::default();
    connect(&mut session, &mock).await.unwrap();
    load(&mut session, &mut mock, ERC20_ABI, TOKEN).await.unwrap();

    let names: Vec<&str> = session.panels().iter().map(|p| p.descriptor().name.as_str()).collect();
    assert_eq!(names, ["balanceOf", "owner", "transfer"]);

    // Reconnecting as the owner reveals mint and burn.
    mock.caller = Some(addr(0xaa));
    connect(&mut session, &mock).await.unwrap();
    assert_eq!(session.panels().len(), 5);

    session.set_filter(Filter::parse("mint"));
    assert_eq!(session.panels().len(), 1);
}

#[tokio::test]
async fn test_unknown_owner_keeps_privileged_visible() {
    let mut mock = MockContract::new().with_caller(addr(0xbb));
    let mut session = Session::default();
    connect(&mut session, &mock).await.unwrap();
    load(&mut session, &mut mock, ERC20_ABI, TOKEN).await.unwrap();
    assert_eq!(session.identity().privileged, None);
    assert_eq!(session.panels().len(), 5);
}

#[tokio::test]
async fn test_failed_connect_is_reported() {
    let mock = MockContract::new();
    let mut session = Session::default();
    assert!(connect(&mut session, &mock).await.is_err());
    assert_eq!(session.status().to_string(), "Error: wallet not connected");
    assert_eq!(session.identity().caller, None);
}

#[tokio::test]
async fn test_bad_load_keeps_previous_contract() {
    let mut mock = MockContract::new();
    let mut session = loaded(&mut mock).await;
    let panels = session.panels().len();

    let err = load(&mut session, &mut mock, ERC20_ABI, "0x1234").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Input(_)));
    let err = load(&mut session, &mut mock, "{", TOKEN).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Input(_)));

    assert_eq!(session.panels().len(), panels);
    assert!(matches!(session.status(), Status::Error(_)));
}

#[tokio::test]
async fn test_reload_drops_pending_confirmation() {
    let mut mock = MockContract::new();
    let mut session = loaded(&mut mock).await;
    let idx = panel_index(&session, "burn");
    session.panel_mut(idx).unwrap().set_input(0, "1").unwrap();
    let controller = InvocationController::new(&mock);
    let Invocation::AwaitingConfirmation(request) =
        controller.execute_panel(&mut session, idx).await.unwrap()
    else {
        panic!("expected confirmation");
    };

    let mut mock = MockContract::new();
    load(&mut session, &mut mock, ERC20_ABI, TOKEN).await.unwrap();
    let controller = InvocationController::new(&mock);
    assert!(controller.resolve(&mut session, request.token, true).await.is_err());
    assert_eq!(mock.count("submit:"), 0);
}

#[tokio::test]
async fn test_live_estimate_readouts() {
    let mut mock = MockContract::new().with_estimate(34_567);
    let mut session = loaded(&mut mock).await;
    let idx = panel_index(&session, "transfer");
    let controller = InvocationController::new(&mock);

    session.panel_mut(idx).unwrap().set_input(0, "0x03").unwrap();
    session.panel_mut(idx).unwrap().set_input(1, "abc").unwrap();
    let readout = controller.live_estimate(&mut session, idx).await.unwrap();
    assert_eq!(readout, FeeReadout::Unavailable);
    assert_eq!(session.panel(idx).unwrap().fee().to_string(), "Estimated Gas: -");

    session.panel_mut(idx).unwrap().set_input(1, "10").unwrap();
    let readout = controller.live_estimate(&mut session, idx).await.unwrap();
    assert_eq!(readout, FeeReadout::Estimated(U256::from(34_567u64)));

    let mut failing = MockContract::new();
    let mut session = loaded(&mut failing).await;
    let idx = panel_index(&session, "transfer");
    session.panel_mut(idx).unwrap().set_input(0, "0x03").unwrap();
    session.panel_mut(idx).unwrap().set_input(1, "10").unwrap();
    let controller = InvocationController::new(&failing);
    let readout = controller.live_estimate(&mut session, idx).await.unwrap();
    assert_eq!(readout.to_string(), "Estimated Gas: Estimation Failed");
}

#[tokio::test]
async fn test_argument_count_mismatch() {
    let mut mock = MockContract::new();
    let mut session = loaded(&mut mock).await;
    let descriptor = session.catalog().by_signature("burn(uint256)").unwrap().clone();
    let controller = InvocationController::new(&mock);
    let err = controller.invoke(&mut session, &descriptor, &[]).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Input(_)));
}

#[tokio::test]
async fn test_reload_resets_filter_to_all() {
    let mut mock = MockContract::new();
    let mut session = loaded(&mut mock).await;
    session.set_filter(Filter::parse("mint"));
    assert_eq!(session.panels().len(), 1);

    load(&mut session, &mut mock, ERC20_ABI, TOKEN).await.unwrap();
    assert_eq!(session.filter(), &Filter::All);
    assert_eq!(session.panels().len(), 5);
}

#[tokio::test]
async fn test_interface_rejected_on_attach_is_input_error() {
    let mut mock = MockContract::new();
    let mut session = loaded(&mut mock).await;

    mock.reject_interface = true;
    let other = "0x0000000000000000000000000000000000000bee";
    let err = load(&mut session, &mut mock, ERC20_ABI, other).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Input(_)));
    assert_eq!(
        session.status().to_string(),
        "Error: invalid interface description: unsupported ABI entry"
    );
    assert_eq!(session.target(), Some(TOKEN.parse().unwrap()));
    assert_eq!(session.panels().len(), 5);
}

#[tokio::test]
async fn test_overload_submits_exact_signature() {
    let abi = r#"[
        {"type":"function","name":"safeTransferFrom","stateMutability":"nonpayable","inputs":[
            {"name":"from","type":"address"},{"name":"to","type":"address"},
            {"name":"id","type":"uint256"}],"outputs":[]},
        {"type":"function","name":"safeTransferFrom","stateMutability":"nonpayable","inputs":[
            {"name":"from","type":"address"},{"name":"to","type":"address"},
            {"name":"id","type":"uint256"},{"name":"data","type":"bytes"}],"outputs":[]}
    ]"#;
    let mut mock = MockContract::new().with_estimate(80_000);
    let mut session = Session::default();
    load(&mut session, &mut mock, abi, TOKEN).await.unwrap();
    assert_eq!(session.panels().len(), 2);

    let idx = session
        .panels()
        .iter()
        .position(|p| p.inputs().len() == 4)
        .unwrap();
    let panel = session.panel_mut(idx).unwrap();
    for (i, text) in ["0x01", "0x02", "7", "0xdead"].into_iter().enumerate() {
        panel.set_input(i, text).unwrap();
    }

    let controller = InvocationController::new(&mock);
    let Invocation::AwaitingConfirmation(request) =
        controller.execute_panel(&mut session, idx).await.unwrap()
    else {
        panic!("expected confirmation");
    };
    controller.resolve(&mut session, request.token, true).await.unwrap();

    assert_eq!(
        mock.log(),
        [
            "estimate:safeTransferFrom(address,address,uint256,bytes)",
            "submit:safeTransferFrom(address,address,uint256,bytes)",
            "finality",
        ]
    );
}
