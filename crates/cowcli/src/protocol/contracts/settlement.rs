use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface GPv2Settlement {
        function setPreSignature(bytes calldata orderUid, bool signed) external;
    }
}
