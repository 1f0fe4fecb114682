use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface MultiSend {
        function multiSend(bytes memory transactions) external payable;
    }
}
